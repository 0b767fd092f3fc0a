//! Prometheus metrics for the conversion webhook.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Result label of a successful conversion
pub const SUCCESS: &str = "success";
/// Result label of a failed conversion
pub const FAILURE: &str = "failure";
/// Direction label when the object could not be classified
pub const UNKNOWN_DIRECTION: &str = "unknown";

/// Conversion counters and the registry exposing them
#[derive(Debug, Clone)]
pub struct Metrics {
    registry: Registry,
    conversions: IntCounterVec,
}

impl Metrics {
    /// Register the conversion counters on a fresh registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let conversions = IntCounterVec::new(
            Opts::new("tenant_conversions_total", "Tenant objects converted, by direction and result"),
            &["direction", "result"],
        )?;
        registry.register(Box::new(conversions.clone()))?;

        Ok(Self {
            registry,
            conversions,
        })
    }

    /// Count one converted object
    pub fn record(&self, direction: &str, result: &str) {
        self.conversions.with_label_values(&[direction, result]).inc();
    }

    /// Current value of a counter, zero if it was never touched
    #[cfg(test)]
    pub fn count(&self, direction: &str, result: &str) -> u64 {
        self.conversions.with_label_values(&[direction, result]).get()
    }

    /// Text exposition of every registered metric
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
