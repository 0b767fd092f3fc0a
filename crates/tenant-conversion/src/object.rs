//! Version-tagged Tenant entrypoint.
//!
//! Conversion requests arrive as untyped JSON. `TenantObject` turns them into
//! one of the two known versions up front, so anything else is reported as a
//! [`ConversionTypeError`] instead of failing somewhere inside a conversion.

use std::fmt;

use crds::{v1alpha1, v1beta1};
use kube::ResourceExt;
use serde_json::Value;

use crate::converter;
use crate::error::{ConversionError, ConversionTypeError};

/// Kind of every converted object
pub const TENANT_KIND: &str = "Tenant";
/// apiVersion of the legacy Tenant
pub const V1ALPHA1_API_VERSION: &str = "capsule.clastix.io/v1alpha1";
/// apiVersion of the structured Tenant
pub const V1BETA1_API_VERSION: &str = "capsule.clastix.io/v1beta1";

/// A Tenant of either served version
#[derive(Debug, Clone, PartialEq)]
pub enum TenantObject {
    /// Legacy annotation encoded Tenant
    V1Alpha1(v1alpha1::Tenant),
    /// Structured Tenant
    V1Beta1(v1beta1::Tenant),
}

/// What a conversion does to an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// v1alpha1 -> v1beta1
    Upgrade,
    /// v1beta1 -> v1alpha1
    Downgrade,
    /// Already at the desired version
    Noop,
}

impl Direction {
    /// Metrics and log label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upgrade => "upgrade",
            Self::Downgrade => "downgrade",
            Self::Noop => "noop",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TenantObject {
    /// Deserialize a Tenant, dispatching on its `apiVersion` and `kind`
    pub fn from_value(value: Value) -> Result<Self, ConversionError> {
        let (api_version, kind) = match (
            value.get("apiVersion").and_then(Value::as_str),
            value.get("kind").and_then(Value::as_str),
        ) {
            (Some(api_version), Some(kind)) => (api_version.to_string(), kind.to_string()),
            _ => return Err(ConversionTypeError::MissingTypeMeta.into()),
        };
        if kind != TENANT_KIND {
            return Err(ConversionTypeError::UnsupportedKind(kind).into());
        }

        match api_version.as_str() {
            V1ALPHA1_API_VERSION => Ok(Self::V1Alpha1(serde_json::from_value(value)?)),
            V1BETA1_API_VERSION => Ok(Self::V1Beta1(serde_json::from_value(value)?)),
            _ => Err(ConversionTypeError::UnsupportedVersion(api_version).into()),
        }
    }

    /// Serialize back to JSON, `apiVersion` and `kind` included
    pub fn into_value(self) -> Result<Value, ConversionError> {
        let value = match self {
            Self::V1Alpha1(tenant) => serde_json::to_value(tenant)?,
            Self::V1Beta1(tenant) => serde_json::to_value(tenant)?,
        };
        Ok(value)
    }

    /// apiVersion the object is at
    pub fn api_version(&self) -> &'static str {
        match self {
            Self::V1Alpha1(_) => V1ALPHA1_API_VERSION,
            Self::V1Beta1(_) => V1BETA1_API_VERSION,
        }
    }

    /// Tenant name
    pub fn name(&self) -> String {
        match self {
            Self::V1Alpha1(tenant) => tenant.name_any(),
            Self::V1Beta1(tenant) => tenant.name_any(),
        }
    }

    /// Direction a conversion to `desired_api_version` takes
    pub fn direction_to(&self, desired_api_version: &str) -> Result<Direction, ConversionTypeError> {
        match (self, desired_api_version) {
            (Self::V1Alpha1(_), V1ALPHA1_API_VERSION) | (Self::V1Beta1(_), V1BETA1_API_VERSION) => Ok(Direction::Noop),
            (Self::V1Alpha1(_), V1BETA1_API_VERSION) => Ok(Direction::Upgrade),
            (Self::V1Beta1(_), V1ALPHA1_API_VERSION) => Ok(Direction::Downgrade),
            _ => Err(ConversionTypeError::UnsupportedVersion(desired_api_version.to_string())),
        }
    }

    /// Convert to `desired_api_version`. Same-version conversion is the identity.
    pub fn convert_to(self, desired_api_version: &str) -> Result<Self, ConversionError> {
        match (self.direction_to(desired_api_version)?, self) {
            (Direction::Upgrade, Self::V1Alpha1(tenant)) => Ok(Self::V1Beta1(converter::upgrade(&tenant)?)),
            (Direction::Downgrade, Self::V1Beta1(tenant)) => Ok(Self::V1Alpha1(converter::downgrade(&tenant))),
            (_, object) => Ok(object),
        }
    }
}

#[cfg(test)]
#[path = "object_test.rs"]
mod object_test;
