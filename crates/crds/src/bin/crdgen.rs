//! Prints the multi-version Tenant CRD as YAML.
//!
//! Usage: `cargo run --bin crdgen > tenant-crd.yaml`
//!
//! The conversion webhook Service is taken from `CONVERSION_SERVICE_NAME` and
//! `CONVERSION_SERVICE_NAMESPACE`.

use std::env;

fn main() -> anyhow::Result<()> {
    let service_name = env::var("CONVERSION_SERVICE_NAME")
        .unwrap_or_else(|_| "tenant-conversion-webhook".to_string());
    let service_namespace = env::var("CONVERSION_SERVICE_NAMESPACE")
        .unwrap_or_else(|_| "capsule-system".to_string());

    let crd = crds::tenant_crd(&service_name, &service_namespace)?;
    print!("{}", serde_yaml::to_string(&crd)?);
    Ok(())
}
