//! Tenant upgrade (v1alpha1 -> v1beta1) and downgrade (v1beta1 -> v1alpha1).
//!
//! Both directions are pure functions of their input. The source is only
//! borrowed and every field of the result is freshly built, so caller and
//! converter never share mutable state.

use crds::v1beta1::{AllowedServices, OwnerSpec, ServiceOptions};
use crds::{v1alpha1, v1beta1};
use kube::ResourceExt;
use tracing::debug;

use crate::annotations::{self, Annotations};
use crate::error::ConversionError;
use crate::fields;
use crate::owners;

/// Convert a legacy Tenant to the structured schema.
///
/// Fails only when `enable-node-ports` or `enable-external-name` holds a
/// non-boolean literal. All parsing happens before the result is assembled,
/// so an error never leaves a half converted object behind.
pub fn upgrade(legacy: &v1alpha1::Tenant) -> Result<v1beta1::Tenant, ConversionError> {
    let tenant = legacy.name_any();
    let empty = Annotations::new();
    let annotations = legacy.metadata.annotations.as_ref().unwrap_or(&empty);

    let allowed_services = parse_allowed_services(&tenant, annotations)?;

    let permissions = owners::decode_permissions(annotations);
    let owner_of = |kind, name: &str| match permissions.get(name) {
        Some(granted) => OwnerSpec::with_permissions(kind, name, granted),
        None => OwnerSpec::new(kind, name),
    };

    let primary = &legacy.spec.owner;
    let mut owner_list = vec![owner_of(owners::upgrade_kind(primary.kind), &primary.name)];
    owner_list.extend(
        owners::decode_owner_names(annotations)
            .into_iter()
            .map(|(kind, name)| owner_of(kind, &name)),
    );

    let mut spec = v1beta1::TenantSpec {
        owners: owner_list,
        ..Default::default()
    };
    fields::upgrade_spec(&legacy.spec, annotations, &mut spec);

    let additional_metadata = legacy.spec.services_metadata.as_ref().map(fields::upgrade_metadata);
    if additional_metadata.is_some() || allowed_services.is_some() {
        spec.service_options = Some(ServiceOptions {
            additional_metadata,
            allowed_services,
        });
    }

    let mut metadata = legacy.metadata.clone();
    annotations::purge_keys(&mut metadata, annotations::MANAGED_KEYS);

    debug!("Upgraded tenant {} to v1beta1 with {} owner(s)", tenant, spec.owners.len());

    Ok(v1beta1::Tenant {
        metadata,
        spec,
        status: legacy.status.as_ref().map(fields::upgrade_status),
    })
}

/// Convert a structured Tenant to the legacy schema.
///
/// Total: unset optional fields simply produce no annotation. A Tenant with
/// no owners downgrades to a default primary owner with an empty name.
pub fn downgrade(tenant: &v1beta1::Tenant) -> v1alpha1::Tenant {
    let mut metadata = tenant.metadata.clone();
    let had_annotations = metadata.annotations.is_some();
    let mut annotations = metadata.annotations.take().unwrap_or_default();
    // Managed keys are rebuilt from the structured fields below.
    for key in annotations::MANAGED_KEYS {
        annotations.remove(key);
    }

    let (primary, additional) = match tenant.spec.owners.split_first() {
        Some((primary, additional)) => (
            v1alpha1::OwnerSpec {
                name: primary.name.clone(),
                kind: owners::downgrade_kind(primary.kind),
            },
            additional,
        ),
        None => (v1alpha1::OwnerSpec::default(), &[][..]),
    };

    for (key, value) in owners::encode_owner_names(additional) {
        annotations.insert(key.to_string(), value);
    }
    for (key, value) in owners::encode_permissions(&tenant.spec.owners) {
        annotations.insert(key.to_string(), value);
    }

    let mut spec = v1alpha1::TenantSpec {
        owner: primary,
        ..Default::default()
    };
    fields::downgrade_spec(&tenant.spec, &mut spec, &mut annotations);

    if let Some(allowed) = tenant
        .spec
        .service_options
        .as_ref()
        .and_then(|options| options.allowed_services.as_ref())
    {
        emit_allowed_services(allowed, &mut annotations);
    }

    if had_annotations || !annotations.is_empty() {
        metadata.annotations = Some(annotations);
    }

    debug!("Downgraded tenant {} to v1alpha1", tenant.name_any());

    v1alpha1::Tenant {
        metadata,
        spec,
        status: tenant.status.as_ref().map(fields::downgrade_status),
    }
}

/// Parse both service toggles, `None` when neither annotation is present
fn parse_allowed_services(tenant: &str, annotations: &Annotations) -> Result<Option<AllowedServices>, ConversionError> {
    let parse = |key: &str| {
        annotations
            .get(key)
            .map(|value| annotations::parse_bool(tenant, key, value))
            .transpose()
    };

    let node_port = parse(annotations::ENABLE_NODE_PORTS)?;
    let external_name = parse(annotations::ENABLE_EXTERNAL_NAME)?;
    if node_port.is_none() && external_name.is_none() {
        return Ok(None);
    }
    Ok(Some(AllowedServices {
        node_port,
        external_name,
    }))
}

/// Write the service toggles that are set; unset toggles leave no annotation
fn emit_allowed_services(allowed: &AllowedServices, annotations: &mut Annotations) {
    if let Some(node_port) = allowed.node_port {
        annotations.insert(
            annotations::ENABLE_NODE_PORTS.to_string(),
            annotations::format_bool(node_port).to_string(),
        );
    }
    if let Some(external_name) = allowed.external_name {
        annotations.insert(
            annotations::ENABLE_EXTERNAL_NAME.to_string(),
            annotations::format_bool(external_name).to_string(),
        );
    }
}

#[cfg(test)]
#[path = "converter_test.rs"]
mod converter_test;
