//! Tenant Schema Conversion
//!
//! Bidirectional conversion between the legacy `v1alpha1` Tenant, which keeps
//! most of its configuration in flat string annotations, and the structured
//! `v1beta1` Tenant.
//!
//! - [`annotations`]: annotation keys, comma lists, boolean literals, key cleanup
//! - [`owners`]: owner lists and the owner -> service kind -> operation relation
//! - [`fields`]: one-to-one field correspondences
//! - [`converter`]: `upgrade` / `downgrade`
//! - [`object`]: version-tagged entrypoint for untyped conversion requests
//!
//! Conversion performs no I/O and keeps no state between calls.

pub mod annotations;
pub mod converter;
pub mod error;
pub mod fields;
pub mod object;
pub mod owners;

pub use converter::{downgrade, upgrade};
pub use error::{ConversionError, ConversionTypeError};
pub use object::{Direction, TenantObject};
