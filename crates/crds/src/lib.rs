//! Tenant CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for both served generations of the
//! `Tenant` resource:
//! - `v1alpha1`: the legacy schema. A single primary owner plus a strict subset
//!   of the tenant policy; everything else rides on metadata annotations.
//! - `v1beta1`: the structured schema and storage version. Owner lists with
//!   proxy permissions, allow-lists, quota scope and service options.
//!
//! Both kinds are cluster scoped and share the `capsule.clastix.io` group.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceConversion, CustomResourceDefinition, ServiceReference, WebhookClientConfig,
    WebhookConversion,
};
use kube::core::crd::{merge_crds, MergeError};
use kube::CustomResourceExt;

pub mod v1alpha1;
pub mod v1beta1;

/// API group shared by every Tenant version
pub const GROUP: &str = "capsule.clastix.io";

/// Version persisted in etcd
pub const STORAGE_VERSION: &str = "v1beta1";

/// Path the conversion webhook serves `ConversionReview` requests on
pub const CONVERSION_PATH: &str = "/convert";

/// Build the multi-version Tenant CRD.
///
/// Both versions are served, `v1beta1` is stored, and conversion between them
/// is delegated to the webhook Service `service_namespace/service_name`.
pub fn tenant_crd(service_name: &str, service_namespace: &str) -> Result<CustomResourceDefinition, MergeError> {
    let mut crd = merge_crds(
        vec![v1alpha1::Tenant::crd(), v1beta1::Tenant::crd()],
        STORAGE_VERSION,
    )?;
    crd.spec.conversion = Some(CustomResourceConversion {
        strategy: "Webhook".to_string(),
        webhook: Some(WebhookConversion {
            client_config: Some(WebhookClientConfig {
                service: Some(ServiceReference {
                    name: service_name.to_string(),
                    namespace: service_namespace.to_string(),
                    path: Some(CONVERSION_PATH.to_string()),
                    port: Some(443),
                }),
                ..Default::default()
            }),
            conversion_review_versions: vec!["v1".to_string()],
        }),
    });
    Ok(crd)
}

#[cfg(test)]
mod lib_test;
