//! Tenant v1beta1 Custom Resource Definition
//!
//! The structured Tenant schema and the storage version of the resource.
//! Owners carry their proxy permissions natively, and every policy knob that
//! v1alpha1 had to smuggle through annotations has a typed field here.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::api::networking::v1 as networkingv1;
use k8s_openapi::api::rbac::v1 as rbacv1;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// TenantSpec defines the desired state of a Tenant
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[kube(
    group = "capsule.clastix.io",
    version = "v1beta1",
    kind = "Tenant",
    shortname = "tnt",
    status = "TenantStatus",
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct TenantSpec {
    /// Tenant owners. The first entry is the primary owner.
    #[serde(default)]
    pub owners: Vec<OwnerSpec>,

    /// Maximum number of namespaces the tenant may create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_quota: Option<i32>,

    /// Labels and annotations pushed onto every tenant namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces_metadata: Option<AdditionalMetadataSpec>,

    /// Service related options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_options: Option<ServiceOptions>,

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

    /// Allowed PriorityClasses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_classes: Option<AllowedListSpec>,

    /// Node selector forced onto tenant namespaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,

    /// NetworkPolicies replicated into every tenant namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_policies: Option<NetworkPolicySpec>,

    /// LimitRanges replicated into every tenant namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_ranges: Option<LimitRangesSpec>,

    /// ResourceQuotas and the level they are enforced at
    #[serde(default, rename = "resourceQuotas", skip_serializing_if = "Option::is_none")]
    pub resource_quota: Option<ResourceQuotaSpec>,

    /// Extra RoleBindings created in every tenant namespace
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_role_bindings: Vec<AdditionalRoleBindingsSpec>,

    /// External IPs Services may use
    #[serde(default, rename = "externalServiceIPs", skip_serializing_if = "Option::is_none")]
    pub external_service_ips: Option<ExternalServiceIpsSpec>,

    /// Image pull policies Pods are allowed to use
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_pull_policies: Vec<ImagePullPolicySpec>,
}

/// Tenant owner with its proxy permissions
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSpec {
    /// Kind of the owner
    pub kind: OwnerKind,

    /// Name of the user, group or service account
    pub name: String,

    /// Operations the owner may perform through the proxy, per service kind
    #[serde(default, rename = "proxySettings", skip_serializing_if = "Vec::is_empty")]
    pub proxy_operations: Vec<ProxySettings>,
}

/// Service kind to operation set relation of a single owner
pub type ProxyPermissions = BTreeMap<ProxyServiceKind, BTreeSet<ProxyOperation>>;

impl OwnerSpec {
    /// Create an owner with no proxy permissions
    pub fn new(kind: OwnerKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            proxy_operations: Vec::new(),
        }
    }

    /// Create an owner whose proxy settings are built from `permissions`
    pub fn with_permissions(kind: OwnerKind, name: impl Into<String>, permissions: &ProxyPermissions) -> Self {
        Self {
            kind,
            name: name.into(),
            proxy_operations: ProxySettings::from_permissions(permissions),
        }
    }

    /// Proxy permissions as a set relation.
    ///
    /// Repeated service kinds are merged and repeated operations collapse.
    pub fn permissions(&self) -> ProxyPermissions {
        let mut permissions = ProxyPermissions::new();
        for setting in &self.proxy_operations {
            permissions
                .entry(setting.kind)
                .or_default()
                .extend(setting.operations.iter().copied());
        }
        permissions.retain(|_, operations| !operations.is_empty());
        permissions
    }
}

/// Kind of a tenant owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum OwnerKind {
    #[default]
    User,
    Group,
    ServiceAccount,
}

/// Proxy permissions of an owner for one service kind
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    pub kind: ProxyServiceKind,

    #[serde(default)]
    pub operations: Vec<ProxyOperation>,
}

impl ProxySettings {
    /// Build proxy settings ordered by service kind, then operation
    pub fn from_permissions(permissions: &ProxyPermissions) -> Vec<Self> {
        permissions
            .iter()
            .filter(|(_, operations)| !operations.is_empty())
            .map(|(kind, operations)| Self {
                kind: *kind,
                operations: operations.iter().copied().collect(),
            })
            .collect()
    }
}

/// Cluster scoped service kinds reachable through the proxy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ProxyServiceKind {
    #[default]
    Nodes,
    StorageClasses,
    IngressClasses,
    PriorityClasses,
}

/// Operations an owner may be granted on a proxied service kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ProxyOperation {
    #[default]
    List,
    Update,
    Delete,
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

/// Service related options
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOptions {
    /// Labels and annotations pushed onto every tenant Service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_metadata: Option<AdditionalMetadataSpec>,

    /// Service types the tenant may create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_services: Option<AllowedServices>,
}

/// Service type toggles. Unset means "use the cluster default".
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AllowedServices {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_port: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_name: Option<bool>,
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

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicySpec {
    #[serde(default)]
    pub items: Vec<networkingv1::NetworkPolicySpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LimitRangesSpec {
    #[serde(default)]
    pub items: Vec<corev1::LimitRangeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuotaSpec {
    /// Level the quota is enforced at
    #[serde(default)]
    pub scope: ResourceQuotaScope,

    #[serde(default)]
    pub items: Vec<corev1::ResourceQuotaSpec>,
}

/// Aggregation level of a resource quota
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum ResourceQuotaScope {
    /// Quota applies to each namespace on its own
    Namespace,
    /// Quota applies to the sum over all tenant namespaces
    #[default]
    Tenant,
}

impl ResourceQuotaScope {
    /// Wire literal of the scope
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "Namespace",
            Self::Tenant => "Tenant",
        }
    }

    /// Parse a scope literal. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Namespace" => Some(Self::Namespace),
            "Tenant" => Some(Self::Tenant),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceQuotaScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RoleBinding to a ClusterRole created in every tenant namespace
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalRoleBindingsSpec {
    pub cluster_role_name: String,

    #[serde(default)]
    pub subjects: Vec<rbacv1::Subject>,
}

/// IPs or CIDRs Services may expose
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExternalServiceIpsSpec {
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// Container image pull policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImagePullPolicySpec {
    Always,
    Never,
    IfNotPresent,
}

impl ImagePullPolicySpec {
    /// Wire literal of the policy
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "Always",
            Self::Never => "Never",
            Self::IfNotPresent => "IfNotPresent",
        }
    }

    /// Parse a pull policy literal. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Always" => Some(Self::Always),
            "Never" => Some(Self::Never),
            "IfNotPresent" => Some(Self::IfNotPresent),
            _ => None,
        }
    }
}

/// TenantStatus defines the observed state of a Tenant
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
