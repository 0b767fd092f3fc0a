//! Owner and proxy permission codec.
//!
//! v1alpha1 flattens the owner -> service kind -> operation relation into 12
//! fixed annotations, one per (service kind, operation) pair, each holding the
//! comma list of owner names granted that pair. Additional owners are listed
//! by name under one annotation per owner kind.
//!
//! Encoding sorts names lexically and drops duplicates, so the output does
//! not depend on owner order. Decoding uses set semantics: a name listed twice
//! under the same key is the same grant.

use std::collections::{BTreeMap, BTreeSet};

use crds::v1alpha1;
use crds::v1beta1::{OwnerKind, OwnerSpec, ProxyOperation, ProxyPermissions, ProxyServiceKind};
use tracing::warn;

use crate::annotations::{self, Annotations, LIST_SEPARATOR};

/// Decoded permissions by owner name
pub type OwnerPermissions = BTreeMap<String, ProxyPermissions>;

/// Proxied service kinds in encoding order
pub const PROXY_SERVICE_KINDS: [ProxyServiceKind; 4] = [
    ProxyServiceKind::Nodes,
    ProxyServiceKind::StorageClasses,
    ProxyServiceKind::IngressClasses,
    ProxyServiceKind::PriorityClasses,
];

/// Proxy operations in encoding order
pub const PROXY_OPERATIONS: [ProxyOperation; 3] = [
    ProxyOperation::List,
    ProxyOperation::Update,
    ProxyOperation::Delete,
];

/// Order additional owners are decoded in
pub const OWNER_KINDS: [OwnerKind; 3] = [OwnerKind::User, OwnerKind::Group, OwnerKind::ServiceAccount];

/// Annotation key granting `operation` on `kind`
pub fn permission_key(kind: ProxyServiceKind, operation: ProxyOperation) -> &'static str {
    use ProxyOperation::{Delete, List, Update};
    use ProxyServiceKind::{IngressClasses, Nodes, PriorityClasses, StorageClasses};

    match (kind, operation) {
        (Nodes, List) => annotations::ENABLE_NODE_LISTING,
        (Nodes, Update) => annotations::ENABLE_NODE_UPDATE,
        (Nodes, Delete) => annotations::ENABLE_NODE_DELETION,
        (StorageClasses, List) => annotations::ENABLE_STORAGE_CLASS_LISTING,
        (StorageClasses, Update) => annotations::ENABLE_STORAGE_CLASS_UPDATE,
        (StorageClasses, Delete) => annotations::ENABLE_STORAGE_CLASS_DELETION,
        (IngressClasses, List) => annotations::ENABLE_INGRESS_CLASS_LISTING,
        (IngressClasses, Update) => annotations::ENABLE_INGRESS_CLASS_UPDATE,
        (IngressClasses, Delete) => annotations::ENABLE_INGRESS_CLASS_DELETION,
        (PriorityClasses, List) => annotations::ENABLE_PRIORITY_CLASS_LISTING,
        (PriorityClasses, Update) => annotations::ENABLE_PRIORITY_CLASS_UPDATE,
        (PriorityClasses, Delete) => annotations::ENABLE_PRIORITY_CLASS_DELETION,
    }
}

/// Annotation key listing additional owners of `kind`
pub fn owner_kind_key(kind: OwnerKind) -> &'static str {
    match kind {
        OwnerKind::User => annotations::OWNER_USERS,
        OwnerKind::Group => annotations::OWNER_GROUPS,
        OwnerKind::ServiceAccount => annotations::OWNER_SERVICE_ACCOUNTS,
    }
}

/// All 12 (service kind, operation, key) triples
pub fn permission_keys() -> impl Iterator<Item = (ProxyServiceKind, ProxyOperation, &'static str)> {
    PROXY_SERVICE_KINDS.into_iter().flat_map(|kind| {
        PROXY_OPERATIONS
            .into_iter()
            .map(move |operation| (kind, operation, permission_key(kind, operation)))
    })
}

/// v1alpha1 owner kind to its v1beta1 counterpart
pub fn upgrade_kind(kind: v1alpha1::Kind) -> OwnerKind {
    match kind {
        v1alpha1::Kind::User => OwnerKind::User,
        v1alpha1::Kind::Group => OwnerKind::Group,
        v1alpha1::Kind::ServiceAccount => OwnerKind::ServiceAccount,
    }
}

/// v1beta1 owner kind to its v1alpha1 counterpart
pub fn downgrade_kind(kind: OwnerKind) -> v1alpha1::Kind {
    match kind {
        OwnerKind::User => v1alpha1::Kind::User,
        OwnerKind::Group => v1alpha1::Kind::Group,
        OwnerKind::ServiceAccount => v1alpha1::Kind::ServiceAccount,
    }
}

/// Names the comma list encoding can carry. Names containing the separator
/// would split into phantom owners on decode and are left out.
fn encodable(name: &str) -> bool {
    if name.is_empty() {
        warn!("Owner with an empty name cannot be encoded in v1alpha1 annotations, skipping");
        return false;
    }
    if name.contains(LIST_SEPARATOR) {
        warn!("Owner name {:?} contains '{}' and cannot be encoded in v1alpha1 annotations, skipping", name, LIST_SEPARATOR);
        return false;
    }
    true
}

/// Encode the proxy permissions of `owners` into the 12 permission keys.
///
/// Keys with no granted owner are omitted from the result.
pub fn encode_permissions(owners: &[OwnerSpec]) -> BTreeMap<&'static str, String> {
    let mut granted: BTreeMap<&'static str, BTreeSet<&str>> = BTreeMap::new();
    for owner in owners.iter().filter(|owner| encodable(&owner.name)) {
        for (kind, operations) in owner.permissions() {
            for operation in operations {
                granted
                    .entry(permission_key(kind, operation))
                    .or_default()
                    .insert(owner.name.as_str());
            }
        }
    }

    granted
        .into_iter()
        .filter_map(|(key, names)| annotations::join_list(names).map(|value| (key, value)))
        .collect()
}

/// Decode the 12 permission keys into per-owner permissions.
///
/// Absent and empty keys contribute nothing.
pub fn decode_permissions(annotations: &Annotations) -> OwnerPermissions {
    let mut permissions = OwnerPermissions::new();
    for (kind, operation, key) in permission_keys() {
        let Some(names) = annotations::list_value(annotations, key) else {
            continue;
        };
        for name in names {
            permissions
                .entry(name.to_string())
                .or_default()
                .entry(kind)
                .or_default()
                .insert(operation);
        }
    }
    permissions
}

/// Encode additional owners into the owner kind keys.
///
/// Callers pass the owners after the primary one.
pub fn encode_owner_names(owners: &[OwnerSpec]) -> BTreeMap<&'static str, String> {
    let mut names: BTreeMap<&'static str, BTreeSet<&str>> = BTreeMap::new();
    for owner in owners.iter().filter(|owner| encodable(&owner.name)) {
        names
            .entry(owner_kind_key(owner.kind))
            .or_default()
            .insert(owner.name.as_str());
    }

    names
        .into_iter()
        .filter_map(|(key, names)| annotations::join_list(names).map(|value| (key, value)))
        .collect()
}

/// Decode the owner kind keys into `(kind, name)` pairs.
///
/// Kinds come out in [`OWNER_KINDS`] order, names sorted and deduplicated
/// within a kind.
pub fn decode_owner_names(annotations: &Annotations) -> Vec<(OwnerKind, String)> {
    let mut owners = Vec::new();
    for kind in OWNER_KINDS {
        let Some(names) = annotations::list_value(annotations, owner_kind_key(kind)) else {
            continue;
        };
        let names: BTreeSet<&str> = names.into_iter().collect();
        owners.extend(names.into_iter().map(|name| (kind, name.to_string())));
    }
    owners
}

#[cfg(test)]
#[path = "owners_test.rs"]
mod owners_test;
