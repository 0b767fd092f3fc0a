//! End-to-end conversion tests through the public API.

use std::collections::{BTreeMap, BTreeSet};

use crds::v1beta1::{OwnerKind, OwnerSpec, ProxyOperation, ProxyPermissions, ProxyServiceKind, ResourceQuotaScope};
use crds::{v1alpha1, v1beta1};
use k8s_openapi::api::core::v1 as corev1;
use tenant_conversion::annotations::{self, Annotations};
use tenant_conversion::owners;
use tenant_conversion::{downgrade, upgrade, ConversionError, TenantObject};

fn legacy(annotations: &[(&str, &str)]) -> v1alpha1::Tenant {
    let mut tenant = v1alpha1::Tenant::new(
        "oil",
        v1alpha1::TenantSpec {
            owner: v1alpha1::OwnerSpec {
                name: "alice".to_string(),
                kind: v1alpha1::Kind::User,
            },
            resource_quota: vec![corev1::ResourceQuotaSpec::default()],
            ..Default::default()
        },
    );
    tenant.metadata.annotations = Some(
        annotations
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );
    tenant
}

fn grants(list: &[(ProxyServiceKind, ProxyOperation)]) -> ProxyPermissions {
    let mut permissions = ProxyPermissions::new();
    for (kind, operation) in list {
        permissions.entry(*kind).or_default().insert(*operation);
    }
    permissions
}

#[test]
fn test_permission_round_trip_is_set_equal() {
    let additional = vec![
        OwnerSpec::with_permissions(
            OwnerKind::Group,
            "teamB",
            &grants(&[
                (ProxyServiceKind::IngressClasses, ProxyOperation::List),
                (ProxyServiceKind::PriorityClasses, ProxyOperation::Delete),
            ]),
        ),
        OwnerSpec::with_permissions(
            OwnerKind::User,
            "bob",
            &grants(&[(ProxyServiceKind::Nodes, ProxyOperation::Update)]),
        ),
        OwnerSpec::new(OwnerKind::ServiceAccount, "system:serviceaccount:oil:ci"),
    ];

    let encoded: Annotations = owners::encode_permissions(&additional)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let decoded = owners::decode_permissions(&encoded);

    for owner in &additional {
        assert_eq!(
            decoded.get(&owner.name).cloned().unwrap_or_default(),
            owner.permissions(),
            "owner {}",
            owner.name
        );
    }
}

#[test]
fn test_primary_owner_survives_round_trip() {
    let source = legacy(&[(annotations::OWNER_USERS, "bob")]);

    let back = downgrade(&upgrade(&source).expect("upgrade should succeed"));
    assert_eq!(back.spec.owner, source.spec.owner);
}

#[test]
fn test_boolean_strictness() {
    let failing = legacy(&[(annotations::ENABLE_NODE_PORTS, "maybe")]);
    match upgrade(&failing) {
        Err(ConversionError::AnnotationParse { key, value, .. }) => {
            assert_eq!(key, "capsule.clastix.io/enable-node-ports");
            assert_eq!(value, "maybe");
        }
        other => panic!("expected AnnotationParse, got {:?}", other),
    }

    for literal in ["true", "1"] {
        let upgraded = upgrade(&legacy(&[(annotations::ENABLE_NODE_PORTS, literal)])).expect("upgrade should succeed");
        let node_port = upgraded
            .spec
            .service_options
            .and_then(|o| o.allowed_services)
            .and_then(|a| a.node_port);
        assert_eq!(node_port, Some(true), "literal {}", literal);
    }
}

#[test]
fn test_resource_quota_scope_default() {
    let scope_of = |tenant: v1alpha1::Tenant| {
        upgrade(&tenant)
            .expect("upgrade should succeed")
            .spec
            .resource_quota
            .map(|rq| rq.scope)
    };

    assert_eq!(scope_of(legacy(&[])), Some(ResourceQuotaScope::Tenant));
    assert_eq!(
        scope_of(legacy(&[(annotations::RESOURCE_QUOTA_SCOPE, "bogus")])),
        Some(ResourceQuotaScope::Tenant)
    );
    assert_eq!(
        scope_of(legacy(&[(annotations::RESOURCE_QUOTA_SCOPE, "Namespace")])),
        Some(ResourceQuotaScope::Namespace)
    );
}

#[test]
fn test_owner_group_annotation_cleanup() {
    let upgraded = upgrade(&legacy(&[(annotations::OWNER_GROUPS, "teamA,teamB")])).expect("upgrade should succeed");

    let groups: Vec<&str> = upgraded
        .spec
        .owners
        .iter()
        .filter(|o| o.kind == OwnerKind::Group)
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(groups, vec!["teamA", "teamB"]);
    assert!(
        !upgraded
            .metadata
            .annotations
            .unwrap_or_default()
            .contains_key(annotations::OWNER_GROUPS)
    );
}

#[test]
fn test_priority_class_allow_list() {
    let upgraded = upgrade(&legacy(&[
        (annotations::PRIORITY_CLASS_ALLOWED, "p1,p2"),
        (annotations::PRIORITY_CLASS_ALLOWED_REGEX, "^std-.*"),
    ]))
    .expect("upgrade should succeed");

    assert_eq!(
        upgraded.spec.priority_classes,
        Some(v1beta1::AllowedListSpec {
            exact: vec!["p1".to_string(), "p2".to_string()],
            regex: Some("^std-.*".to_string()),
        })
    );
}

#[test]
fn test_downgrade_example() {
    let mut tenant = v1beta1::Tenant::new("oil", v1beta1::TenantSpec::default());
    tenant.spec.owners = vec![
        OwnerSpec::with_permissions(
            OwnerKind::User,
            "alice",
            &grants(&[
                (ProxyServiceKind::Nodes, ProxyOperation::List),
                (ProxyServiceKind::Nodes, ProxyOperation::Update),
            ]),
        ),
        OwnerSpec::with_permissions(
            OwnerKind::Group,
            "teamA",
            &grants(&[(ProxyServiceKind::Nodes, ProxyOperation::List)]),
        ),
    ];

    let legacy = downgrade(&tenant);
    assert_eq!(legacy.spec.owner.name, "alice");
    assert_eq!(legacy.spec.owner.kind, v1alpha1::Kind::User);

    let annotations = legacy.metadata.annotations.expect("annotations should be set");
    assert_eq!(annotations[annotations::OWNER_GROUPS], "teamA");
    let listing: BTreeSet<&str> = annotations::split_list(&annotations[annotations::ENABLE_NODE_LISTING])
        .into_iter()
        .collect();
    assert_eq!(listing, BTreeSet::from(["alice", "teamA"]));
    assert_eq!(annotations[annotations::ENABLE_NODE_UPDATE], "alice");
}

#[test]
fn test_full_legacy_round_trip() {
    let mut source = legacy(&[
        (annotations::OWNER_GROUPS, "teamA"),
        (annotations::OWNER_SERVICE_ACCOUNTS, "system:serviceaccount:oil:ci"),
        (annotations::ENABLE_NODE_LISTING, "alice,teamA"),
        (annotations::ENABLE_STORAGE_CLASS_DELETION, "system:serviceaccount:oil:ci"),
        (annotations::ALLOWED_IMAGE_PULL_POLICY, "Always,IfNotPresent"),
        (annotations::PRIORITY_CLASS_ALLOWED, "p1"),
        (annotations::ENABLE_NODE_PORTS, "true"),
        (annotations::ENABLE_EXTERNAL_NAME, "false"),
        (annotations::RESOURCE_QUOTA_SCOPE, "Namespace"),
        ("example.com/unrelated", "kept"),
    ]);
    source.metadata.labels = Some(BTreeMap::from([("env".to_string(), "prod".to_string())]));
    source.spec.ingress_hostnames = Some(v1alpha1::AllowedListSpec {
        exact: vec!["oil.example.com".to_string()],
        regex: None,
    });
    source.status = Some(v1alpha1::TenantStatus {
        size: 2,
        namespaces: vec!["oil-a".to_string(), "oil-b".to_string()],
    });

    let upgraded = upgrade(&source).expect("upgrade should succeed");
    assert_eq!(upgraded.spec.owners.len(), 3);
    assert_eq!(
        upgraded.spec.image_pull_policies,
        vec![v1beta1::ImagePullPolicySpec::Always, v1beta1::ImagePullPolicySpec::IfNotPresent]
    );

    let back = downgrade(&upgraded);
    assert_eq!(back, source);
}

#[test]
fn test_tenant_object_rejects_unknown_versions() {
    let value = serde_json::json!({
        "apiVersion": "capsule.clastix.io/v2",
        "kind": "Tenant",
        "metadata": { "name": "oil" },
        "spec": {}
    });

    assert!(matches!(
        TenantObject::from_value(value),
        Err(ConversionError::ConversionType(_))
    ));
}
