//! Annotation keys and the string codec for annotation values.
//!
//! The v1alpha1 Tenant carries everything it cannot model natively as
//! annotations. Key names are a wire contract with existing objects and must
//! not change. List values are joined with an unescaped comma, so list
//! elements containing a comma cannot be represented.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::error::ConversionError;

/// Annotation map as stored on `ObjectMeta`
pub type Annotations = BTreeMap<String, String>;

/// Separator of list-valued annotations
pub const LIST_SEPARATOR: char = ',';

/// Resource quota scope, `Tenant` or `Namespace`
pub const RESOURCE_QUOTA_SCOPE: &str = "capsule.clastix.io/resource-quota-scope";

/// Allowed image pull policies (list)
pub const ALLOWED_IMAGE_PULL_POLICY: &str = "capsule.clastix.io/allowed-image-pull-policy";

/// Allowed PriorityClass names (list)
pub const PRIORITY_CLASS_ALLOWED: &str = "priorityclass.capsule.clastix.io/allowed";
/// Regular expression matching allowed PriorityClasses
pub const PRIORITY_CLASS_ALLOWED_REGEX: &str = "priorityclass.capsule.clastix.io/allowed-regex";

/// NodePort Services toggle (boolean)
pub const ENABLE_NODE_PORTS: &str = "capsule.clastix.io/enable-node-ports";
/// ExternalName Services toggle (boolean)
pub const ENABLE_EXTERNAL_NAME: &str = "capsule.clastix.io/enable-external-name";

/// Additional Group owners (list)
pub const OWNER_GROUPS: &str = "owners.capsule.clastix.io/group";
/// Additional User owners (list)
pub const OWNER_USERS: &str = "owners.capsule.clastix.io/user";
/// Additional ServiceAccount owners (list)
pub const OWNER_SERVICE_ACCOUNTS: &str = "owners.capsule.clastix.io/serviceaccount";

/// Owners granted node listing through the proxy
pub const ENABLE_NODE_LISTING: &str = "capsule.clastix.io/enable-node-listing";
/// Owners granted node update
pub const ENABLE_NODE_UPDATE: &str = "capsule.clastix.io/enable-node-update";
/// Owners granted node deletion
pub const ENABLE_NODE_DELETION: &str = "capsule.clastix.io/enable-node-deletion";
/// Owners granted storageclass listing
pub const ENABLE_STORAGE_CLASS_LISTING: &str = "capsule.clastix.io/enable-storageclass-listing";
/// Owners granted storageclass update
pub const ENABLE_STORAGE_CLASS_UPDATE: &str = "capsule.clastix.io/enable-storageclass-update";
/// Owners granted storageclass deletion
pub const ENABLE_STORAGE_CLASS_DELETION: &str = "capsule.clastix.io/enable-storageclass-deletion";
/// Owners granted ingressclass listing
pub const ENABLE_INGRESS_CLASS_LISTING: &str = "capsule.clastix.io/enable-ingressclass-listing";
/// Owners granted ingressclass update
pub const ENABLE_INGRESS_CLASS_UPDATE: &str = "capsule.clastix.io/enable-ingressclass-update";
/// Owners granted ingressclass deletion
pub const ENABLE_INGRESS_CLASS_DELETION: &str = "capsule.clastix.io/enable-ingressclass-deletion";
/// Owners granted priorityclass listing
pub const ENABLE_PRIORITY_CLASS_LISTING: &str = "capsule.clastix.io/enable-priorityclass-listing";
/// Owners granted priorityclass update
pub const ENABLE_PRIORITY_CLASS_UPDATE: &str = "capsule.clastix.io/enable-priorityclass-update";
/// Owners granted priorityclass deletion
pub const ENABLE_PRIORITY_CLASS_DELETION: &str = "capsule.clastix.io/enable-priorityclass-deletion";

/// Every annotation key whose content is owned by the conversion.
///
/// Upgrading removes all of them from the converted metadata, downgrading
/// rebuilds them from the structured fields.
pub const MANAGED_KEYS: [&str; 21] = [
    ALLOWED_IMAGE_PULL_POLICY,
    PRIORITY_CLASS_ALLOWED,
    PRIORITY_CLASS_ALLOWED_REGEX,
    ENABLE_NODE_PORTS,
    ENABLE_EXTERNAL_NAME,
    OWNER_GROUPS,
    OWNER_USERS,
    OWNER_SERVICE_ACCOUNTS,
    ENABLE_NODE_LISTING,
    ENABLE_NODE_UPDATE,
    ENABLE_NODE_DELETION,
    ENABLE_STORAGE_CLASS_LISTING,
    ENABLE_STORAGE_CLASS_UPDATE,
    ENABLE_STORAGE_CLASS_DELETION,
    ENABLE_INGRESS_CLASS_LISTING,
    ENABLE_INGRESS_CLASS_UPDATE,
    ENABLE_INGRESS_CLASS_DELETION,
    ENABLE_PRIORITY_CLASS_LISTING,
    ENABLE_PRIORITY_CLASS_UPDATE,
    ENABLE_PRIORITY_CLASS_DELETION,
    RESOURCE_QUOTA_SCOPE,
];

/// Join list elements with commas.
///
/// Returns `None` for an empty list: the annotation must then be omitted,
/// never written as an empty string.
pub fn join_list<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined: Option<String> = None;
    for value in values {
        match joined.as_mut() {
            Some(out) => {
                out.push(LIST_SEPARATOR);
                out.push_str(value.as_ref());
            }
            None => joined = Some(value.as_ref().to_string()),
        }
    }
    joined
}

/// Split a comma list.
///
/// An empty input yields a single empty element; callers that treat empty
/// annotation values as absent go through [`list_value`] instead.
pub fn split_list(value: &str) -> Vec<&str> {
    value.split(LIST_SEPARATOR).collect()
}

/// Read a list-valued annotation.
///
/// Absent keys and empty values both yield `None`. Empty elements (`"a,,b"`)
/// are dropped since they cannot name anything.
pub fn list_value<'a>(annotations: &'a Annotations, key: &str) -> Option<Vec<&'a str>> {
    let value = annotations.get(key).filter(|v| !v.is_empty())?;
    Some(split_list(value).into_iter().filter(|v| !v.is_empty()).collect())
}

/// Read a scalar annotation, treating an empty value as absent
pub fn scalar_value<'a>(annotations: &'a Annotations, key: &str) -> Option<&'a str> {
    annotations
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// Write a list-valued annotation, omitting it when the list is empty
pub fn set_list<I, S>(annotations: &mut Annotations, key: &str, values: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(joined) = join_list(values) {
        annotations.insert(key.to_string(), joined);
    }
}

/// Parse a boolean annotation value.
///
/// Accepts `1`, `t`, `T`, `true`, `True`, `TRUE` and their false
/// counterparts. Every other spelling is rejected, mixed case and the empty
/// string included.
pub fn parse_bool(tenant: &str, key: &str, value: &str) -> Result<bool, ConversionError> {
    match value {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Ok(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Ok(false),
        _ => Err(ConversionError::AnnotationParse {
            tenant: tenant.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Canonical boolean literal
pub fn format_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Remove `keys` from the metadata annotations. Missing keys are ignored.
pub fn purge_keys<'k, I>(metadata: &mut ObjectMeta, keys: I)
where
    I: IntoIterator<Item = &'k str>,
{
    if let Some(annotations) = metadata.annotations.as_mut() {
        for key in keys {
            annotations.remove(key);
        }
    }
}

#[cfg(test)]
#[path = "annotations_test.rs"]
mod annotations_test;
