//! Tenant v1alpha1 Custom Resource Definition
//!
//! The legacy Tenant schema. It only models a single owner and the policy
//! fields that predate the structured schema; additional owners, proxy
//! permissions, image pull policies, priority classes, service toggles and the
//! resource quota scope are carried as annotations on the object metadata.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::api::networking::v1 as networkingv1;
use k8s_openapi::api::rbac::v1 as rbacv1;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// TenantSpec defines the desired state of a legacy Tenant
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[kube(
    group = "capsule.clastix.io",
    version = "v1alpha1",
    kind = "Tenant",
    shortname = "tnt",
    status = "TenantStatus",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct TenantSpec {
    /// Primary owner of the tenant
    pub owner: OwnerSpec,

    /// Maximum number of namespaces the tenant may create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_quota: Option<i32>,

    /// Labels and annotations pushed onto every tenant namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces_metadata: Option<AdditionalMetadataSpec>,

    /// Labels and annotations pushed onto every tenant Service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services_metadata: Option<AdditionalMetadataSpec>,

    /// Allowed StorageClasses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_classes: Option<AllowedListSpec>,

    /// Allowed IngressClasses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_classes: Option<AllowedListSpec>,

    /// Allowed Ingress hostnames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_hostnames: Option<AllowedListSpec>,

    /// Allowed container registries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_registries: Option<AllowedListSpec>,

    /// Node selector forced onto tenant namespaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    /// NetworkPolicies replicated into every tenant namespace
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_policies: Vec<networkingv1::NetworkPolicySpec>,

    /// LimitRanges replicated into every tenant namespace
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limit_ranges: Vec<corev1::LimitRangeSpec>,

    /// ResourceQuotas replicated into every tenant namespace
    #[serde(default, rename = "resourceQuotas", skip_serializing_if = "Vec::is_empty")]
    pub resource_quota: Vec<corev1::ResourceQuotaSpec>,

    /// Extra RoleBindings created in every tenant namespace
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_role_bindings: Vec<AdditionalRoleBindingsSpec>,

    /// External IPs Services may use
    #[serde(default, rename = "externalServiceIPs", skip_serializing_if = "Option::is_none")]
    pub external_service_ips: Option<ExternalServiceIpsSpec>,
}

/// Owner reference of a legacy Tenant
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSpec {
    /// Name of the user, group or service account
    pub name: String,

    /// Kind of the owner
    pub kind: Kind,
}

/// Kind of a legacy owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum Kind {
    #[default]
    User,
    Group,
    ServiceAccount,
}

/// Additional labels and annotations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalMetadataSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_labels: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_annotations: Option<BTreeMap<String, String>>,
}

/// Allow-list matched either by exact value or by regular expression
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AllowedListSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exact: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// RoleBinding to a ClusterRole created in every tenant namespace
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalRoleBindingsSpec {
    pub cluster_role_name: String,

    #[serde(default)]
    pub subjects: Vec<rbacv1::Subject>,
}

/// IPs or CIDRs Services of type LoadBalancer/ClusterIP may expose
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalServiceIpsSpec {
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// TenantStatus defines the observed state of a legacy Tenant
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TenantStatus {
    /// Number of namespaces owned by the tenant
    #[serde(default)]
    pub size: u32,

    /// Names of the namespaces owned by the tenant
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
}
