//! Direct field correspondences between the two Tenant versions.
//!
//! Optional sources produce freshly built destination values; nothing is
//! shared between the source and the converted object. Annotation-backed
//! fields that are not about owners (image pull policies, priority classes,
//! resource quota scope) are mapped here as well.

use crds::{v1alpha1, v1beta1};
use tracing::warn;

use crate::annotations::{self, Annotations};

/// Copy every directly mapped field of a legacy spec into `dst`.
///
/// Owners and service options are left to the caller.
pub fn upgrade_spec(src: &v1alpha1::TenantSpec, annotations: &Annotations, dst: &mut v1beta1::TenantSpec) {
    dst.namespace_quota = src.namespace_quota;
    dst.node_selector = src.node_selector.clone();

    dst.namespaces_metadata = src.namespaces_metadata.as_ref().map(upgrade_metadata);

    dst.storage_classes = src.storage_classes.as_ref().map(upgrade_allowed_list);
    dst.ingress_classes = src.ingress_classes.as_ref().map(upgrade_allowed_list);
    dst.ingress_hostnames = src.ingress_hostnames.as_ref().map(upgrade_allowed_list);
    dst.container_registries = src.container_registries.as_ref().map(upgrade_allowed_list);
    dst.priority_classes = upgrade_priority_classes(annotations);

    if !src.network_policies.is_empty() {
        dst.network_policies = Some(v1beta1::NetworkPolicySpec {
            items: src.network_policies.clone(),
        });
    }
    if !src.limit_ranges.is_empty() {
        dst.limit_ranges = Some(v1beta1::LimitRangesSpec {
            items: src.limit_ranges.clone(),
        });
    }
    if !src.resource_quota.is_empty() {
        dst.resource_quota = Some(v1beta1::ResourceQuotaSpec {
            scope: upgrade_quota_scope(annotations),
            items: src.resource_quota.clone(),
        });
    }

    dst.additional_role_bindings = src
        .additional_role_bindings
        .iter()
        .map(|rb| v1beta1::AdditionalRoleBindingsSpec {
            cluster_role_name: rb.cluster_role_name.clone(),
            subjects: rb.subjects.clone(),
        })
        .collect();

    dst.external_service_ips = src
        .external_service_ips
        .as_ref()
        .map(|ips| v1beta1::ExternalServiceIpsSpec {
            allowed: ips.allowed.clone(),
        });

    dst.image_pull_policies = upgrade_image_pull_policies(annotations);
}

/// Copy every directly mapped field of a structured spec into `dst`,
/// writing annotation-backed fields into `annotations`.
///
/// Owners and allowed services are left to the caller.
pub fn downgrade_spec(src: &v1beta1::TenantSpec, dst: &mut v1alpha1::TenantSpec, annotations: &mut Annotations) {
    dst.namespace_quota = src.namespace_quota;
    dst.node_selector = src.node_selector.clone();

    dst.namespaces_metadata = src.namespaces_metadata.as_ref().map(downgrade_metadata);
    dst.services_metadata = src
        .service_options
        .as_ref()
        .and_then(|options| options.additional_metadata.as_ref())
        .map(downgrade_metadata);

    dst.storage_classes = src.storage_classes.as_ref().map(downgrade_allowed_list);
    dst.ingress_classes = src.ingress_classes.as_ref().map(downgrade_allowed_list);
    dst.ingress_hostnames = src.ingress_hostnames.as_ref().map(downgrade_allowed_list);
    dst.container_registries = src.container_registries.as_ref().map(downgrade_allowed_list);
    if let Some(priority_classes) = &src.priority_classes {
        downgrade_priority_classes(priority_classes, annotations);
    }

    if let Some(network_policies) = &src.network_policies {
        dst.network_policies = network_policies.items.clone();
    }
    if let Some(limit_ranges) = &src.limit_ranges {
        dst.limit_ranges = limit_ranges.items.clone();
    }
    if let Some(resource_quota) = &src.resource_quota {
        annotations.insert(
            annotations::RESOURCE_QUOTA_SCOPE.to_string(),
            resource_quota.scope.as_str().to_string(),
        );
        dst.resource_quota = resource_quota.items.clone();
    }

    dst.additional_role_bindings = src
        .additional_role_bindings
        .iter()
        .map(|rb| v1alpha1::AdditionalRoleBindingsSpec {
            cluster_role_name: rb.cluster_role_name.clone(),
            subjects: rb.subjects.clone(),
        })
        .collect();

    dst.external_service_ips = src
        .external_service_ips
        .as_ref()
        .map(|ips| v1alpha1::ExternalServiceIpsSpec {
            allowed: ips.allowed.clone(),
        });

    annotations::set_list(
        annotations,
        annotations::ALLOWED_IMAGE_PULL_POLICY,
        src.image_pull_policies.iter().map(|policy| policy.as_str()),
    );
}

/// Copy additional metadata from v1alpha1
pub fn upgrade_metadata(src: &v1alpha1::AdditionalMetadataSpec) -> v1beta1::AdditionalMetadataSpec {
    v1beta1::AdditionalMetadataSpec {
        additional_labels: src.additional_labels.clone(),
        additional_annotations: src.additional_annotations.clone(),
    }
}

/// Copy additional metadata to v1alpha1
pub fn downgrade_metadata(src: &v1beta1::AdditionalMetadataSpec) -> v1alpha1::AdditionalMetadataSpec {
    v1alpha1::AdditionalMetadataSpec {
        additional_labels: src.additional_labels.clone(),
        additional_annotations: src.additional_annotations.clone(),
    }
}

/// Copy an allow-list from v1alpha1
pub fn upgrade_allowed_list(src: &v1alpha1::AllowedListSpec) -> v1beta1::AllowedListSpec {
    v1beta1::AllowedListSpec {
        exact: src.exact.clone(),
        regex: src.regex.clone(),
    }
}

/// Copy an allow-list to v1alpha1
pub fn downgrade_allowed_list(src: &v1beta1::AllowedListSpec) -> v1alpha1::AllowedListSpec {
    v1alpha1::AllowedListSpec {
        exact: src.exact.clone(),
        regex: src.regex.clone(),
    }
}

/// Copy the status from v1alpha1
pub fn upgrade_status(src: &v1alpha1::TenantStatus) -> v1beta1::TenantStatus {
    v1beta1::TenantStatus {
        size: src.size,
        namespaces: src.namespaces.clone(),
    }
}

/// Copy the status to v1alpha1
pub fn downgrade_status(src: &v1beta1::TenantStatus) -> v1alpha1::TenantStatus {
    v1alpha1::TenantStatus {
        size: src.size,
        namespaces: src.namespaces.clone(),
    }
}

/// Resource quota scope from its annotation.
///
/// Absent or unrecognized values fall back to `Tenant`.
pub fn upgrade_quota_scope(annotations: &Annotations) -> v1beta1::ResourceQuotaScope {
    annotations
        .get(annotations::RESOURCE_QUOTA_SCOPE)
        .and_then(|value| v1beta1::ResourceQuotaScope::parse(value))
        .unwrap_or_default()
}

/// Priority class allow-list from its two annotations, `None` when both are absent
pub fn upgrade_priority_classes(annotations: &Annotations) -> Option<v1beta1::AllowedListSpec> {
    let exact = annotations::list_value(annotations, annotations::PRIORITY_CLASS_ALLOWED);
    let regex = annotations::scalar_value(annotations, annotations::PRIORITY_CLASS_ALLOWED_REGEX);
    if exact.is_none() && regex.is_none() {
        return None;
    }

    Some(v1beta1::AllowedListSpec {
        exact: exact
            .unwrap_or_default()
            .into_iter()
            .map(str::to_string)
            .collect(),
        regex: regex.map(str::to_string),
    })
}

/// Write the priority class allow-list. An empty regex is not written.
pub fn downgrade_priority_classes(src: &v1beta1::AllowedListSpec, annotations: &mut Annotations) {
    annotations::set_list(annotations, annotations::PRIORITY_CLASS_ALLOWED, &src.exact);
    if let Some(regex) = src.regex.as_deref().filter(|regex| !regex.is_empty()) {
        annotations.insert(
            annotations::PRIORITY_CLASS_ALLOWED_REGEX.to_string(),
            regex.to_string(),
        );
    }
}

/// Image pull policies from their annotation. Unknown literals are dropped.
pub fn upgrade_image_pull_policies(annotations: &Annotations) -> Vec<v1beta1::ImagePullPolicySpec> {
    annotations::list_value(annotations, annotations::ALLOWED_IMAGE_PULL_POLICY)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|literal| {
            let policy = v1beta1::ImagePullPolicySpec::parse(literal);
            if policy.is_none() {
                warn!("Ignoring unknown image pull policy {:?} in {} annotation", literal, annotations::ALLOWED_IMAGE_PULL_POLICY);
            }
            policy
        })
        .collect()
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod fields_test;
