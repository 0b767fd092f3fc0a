//! Unit tests for the Tenant CRD definitions

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::collections::BTreeSet;
    use v1beta1::{OwnerKind, OwnerSpec, ProxyOperation, ProxyPermissions, ProxyServiceKind, ProxySettings};

    #[test]
    fn test_tenant_crd_serves_both_versions() {
        let crd = tenant_crd("webhook", "capsule-system").expect("CRDs should merge");

        assert_eq!(crd.spec.group, GROUP);
        let versions: Vec<(&str, bool, bool)> = crd
            .spec
            .versions
            .iter()
            .map(|v| (v.name.as_str(), v.served, v.storage))
            .collect();
        assert_eq!(versions, vec![("v1beta1", true, true), ("v1alpha1", true, false)]);
    }

    #[test]
    fn test_tenant_crd_points_at_conversion_webhook() {
        let crd = tenant_crd("webhook", "capsule-system").expect("CRDs should merge");

        let conversion = crd.spec.conversion.expect("conversion should be set");
        assert_eq!(conversion.strategy, "Webhook");
        let webhook = conversion.webhook.expect("webhook config should be set");
        assert_eq!(webhook.conversion_review_versions, vec!["v1".to_string()]);
        let service = webhook
            .client_config
            .and_then(|c| c.service)
            .expect("service reference should be set");
        assert_eq!(service.name, "webhook");
        assert_eq!(service.namespace, "capsule-system");
        assert_eq!(service.path.as_deref(), Some(CONVERSION_PATH));
    }

    #[test]
    fn test_v1beta1_wire_names() {
        let mut tenant = v1beta1::Tenant::new("oil", v1beta1::TenantSpec::default());
        tenant.spec.owners = vec![OwnerSpec {
            kind: OwnerKind::ServiceAccount,
            name: "system:serviceaccount:oil:robot".to_string(),
            proxy_operations: vec![ProxySettings {
                kind: ProxyServiceKind::Nodes,
                operations: vec![ProxyOperation::List],
            }],
        }];
        tenant.spec.resource_quota = Some(v1beta1::ResourceQuotaSpec::default());
        tenant.spec.external_service_ips = Some(v1beta1::ExternalServiceIpsSpec {
            allowed: vec!["10.0.0.0/8".to_string()],
        });

        let value = serde_json::to_value(&tenant).expect("tenant should serialize");
        assert_eq!(value["apiVersion"], "capsule.clastix.io/v1beta1");
        assert_eq!(value["kind"], "Tenant");
        assert_eq!(value["spec"]["owners"][0]["kind"], "ServiceAccount");
        assert_eq!(value["spec"]["owners"][0]["proxySettings"][0]["kind"], "Nodes");
        assert_eq!(value["spec"]["resourceQuotas"]["scope"], "Tenant");
        assert_eq!(value["spec"]["externalServiceIPs"]["allowed"][0], "10.0.0.0/8");
    }

    #[test]
    fn test_v1alpha1_deserializes_legacy_document() {
        let value = serde_json::json!({
            "apiVersion": "capsule.clastix.io/v1alpha1",
            "kind": "Tenant",
            "metadata": { "name": "oil" },
            "spec": {
                "owner": { "name": "alice", "kind": "User" },
                "namespaceQuota": 3,
                "resourceQuotas": [ { "hard": { "pods": "10" } } ]
            }
        });

        let tenant: v1alpha1::Tenant = serde_json::from_value(value).expect("legacy tenant should parse");
        assert_eq!(tenant.spec.owner.name, "alice");
        assert_eq!(tenant.spec.owner.kind, v1alpha1::Kind::User);
        assert_eq!(tenant.spec.namespace_quota, Some(3));
        assert_eq!(tenant.spec.resource_quota.len(), 1);
        assert!(tenant.status.is_none());
    }

    #[test]
    fn test_owner_permissions_merge_repeated_settings() {
        let owner = OwnerSpec {
            kind: OwnerKind::User,
            name: "alice".to_string(),
            proxy_operations: vec![
                ProxySettings {
                    kind: ProxyServiceKind::Nodes,
                    operations: vec![ProxyOperation::Update, ProxyOperation::List],
                },
                ProxySettings {
                    kind: ProxyServiceKind::Nodes,
                    operations: vec![ProxyOperation::List],
                },
                ProxySettings {
                    kind: ProxyServiceKind::StorageClasses,
                    operations: vec![],
                },
            ],
        };

        let permissions = owner.permissions();
        assert_eq!(permissions.len(), 1, "empty operation lists should not create entries");
        assert_eq!(
            permissions[&ProxyServiceKind::Nodes],
            BTreeSet::from([ProxyOperation::List, ProxyOperation::Update])
        );
    }

    #[test]
    fn test_proxy_settings_from_permissions_is_ordered() {
        let mut permissions = ProxyPermissions::new();
        permissions.insert(
            ProxyServiceKind::PriorityClasses,
            BTreeSet::from([ProxyOperation::Delete, ProxyOperation::List]),
        );
        permissions.insert(ProxyServiceKind::Nodes, BTreeSet::from([ProxyOperation::Update]));

        let settings = ProxySettings::from_permissions(&permissions);
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].kind, ProxyServiceKind::Nodes);
        assert_eq!(settings[1].kind, ProxyServiceKind::PriorityClasses);
        assert_eq!(settings[1].operations, vec![ProxyOperation::List, ProxyOperation::Delete]);
    }

    #[test]
    fn test_resource_quota_scope_literals() {
        assert_eq!(v1beta1::ResourceQuotaScope::parse("Namespace"), Some(v1beta1::ResourceQuotaScope::Namespace));
        assert_eq!(v1beta1::ResourceQuotaScope::parse("Tenant"), Some(v1beta1::ResourceQuotaScope::Tenant));
        assert_eq!(v1beta1::ResourceQuotaScope::parse("namespace"), None);
        assert_eq!(v1beta1::ResourceQuotaScope::default().to_string(), "Tenant");
    }
}
