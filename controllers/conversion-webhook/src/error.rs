//! Webhook-specific error types.
//!
//! Conversion failures are not errors at this level: they are reported back
//! to the API server inside the `ConversionReview` response.

use thiserror::Error;

/// Errors that can stop the Conversion Webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Listener or server I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
