//! Conversion error types.
//!
//! Only two things can make a conversion fail: a boolean annotation holding
//! something that is not a boolean literal, and an object that is not one of
//! the two known Tenant versions.

use thiserror::Error;

/// Errors that can occur while converting a Tenant between versions.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A boolean annotation holds a non-boolean literal
    #[error("unable to parse {key} annotation on tenant {tenant}: {value:?} is not a boolean literal")]
    AnnotationParse {
        /// Name of the Tenant carrying the annotation
        tenant: String,
        /// Annotation key
        key: String,
        /// Raw annotation value
        value: String,
    },

    /// The object is not a Tenant of a known version
    #[error("Conversion type error: {0}")]
    ConversionType(#[from] ConversionTypeError),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The conversion entrypoint received something it cannot convert.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionTypeError {
    /// `apiVersion` or `kind` is missing or not a string
    #[error("object has no apiVersion/kind")]
    MissingTypeMeta,

    /// Kind other than Tenant
    #[error("unsupported kind {0}, expected Tenant")]
    UnsupportedKind(String),

    /// apiVersion other than the two served Tenant versions
    #[error("unsupported apiVersion {0}")]
    UnsupportedVersion(String),
}
