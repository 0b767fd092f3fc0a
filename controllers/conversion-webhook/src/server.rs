//! HTTP surface of the conversion webhook.
//!
//! - `POST /convert`: Kubernetes `ConversionReview` (apiextensions.k8s.io/v1)
//! - `GET /healthz`, `GET /readyz`: probes
//! - `GET /metrics`: Prometheus exposition

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use kube::core::conversion::{ConversionRequest, ConversionResponse, ConversionReview};
use kube::core::Status;
use serde_json::Value;
use tenant_conversion::{ConversionError, Direction, TenantObject};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::metrics::{self, Metrics};

/// Build the webhook router
pub fn router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route(crds::CONVERSION_PATH, post(convert))
        .route("/healthz", get(probe))
        .route("/readyz", get(probe))
        .route("/metrics", get(render_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(metrics)
}

async fn convert(State(metrics): State<Arc<Metrics>>, Json(review): Json<ConversionReview>) -> Json<ConversionReview> {
    Json(review_response(review, &metrics))
}

async fn probe() -> &'static str {
    "ok"
}

async fn render_metrics(State(metrics): State<Arc<Metrics>>) -> (StatusCode, String) {
    match metrics.render() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Answer a `ConversionReview`.
///
/// Either every object converts or the whole review fails; the API server
/// never receives a partially converted list.
pub fn review_response(review: ConversionReview, metrics: &Metrics) -> ConversionReview {
    let mut request = match ConversionRequest::from_review(review) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejecting malformed ConversionReview: {}", e);
            return ConversionResponse::invalid(Status::failure(&e.to_string(), "InvalidRequest")).into_review();
        }
    };

    let desired_api_version = request.desired_api_version.clone();
    let objects = std::mem::take(&mut request.objects);
    let response = ConversionResponse::for_request(request);

    match convert_objects(objects, &desired_api_version, metrics) {
        Ok(converted) => response.success(converted).into_review(),
        Err(e) => {
            error!("Tenant conversion to {} failed: {}", desired_api_version, e);
            response
                .failure(Status::failure(&e.to_string(), "ConversionFailed"))
                .into_review()
        }
    }
}

fn convert_objects(objects: Vec<Value>, desired_api_version: &str, metrics: &Metrics) -> Result<Vec<Value>, ConversionError> {
    objects
        .into_iter()
        .map(|object| {
            let (tenant, direction) = match classify(object, desired_api_version) {
                Ok(classified) => classified,
                Err(e) => {
                    metrics.record(metrics::UNKNOWN_DIRECTION, metrics::FAILURE);
                    return Err(e);
                }
            };

            let result = tenant
                .convert_to(desired_api_version)
                .and_then(TenantObject::into_value);
            let outcome = if result.is_ok() { metrics::SUCCESS } else { metrics::FAILURE };
            metrics.record(direction.as_str(), outcome);
            result
        })
        .collect()
}

fn classify(object: Value, desired_api_version: &str) -> Result<(TenantObject, Direction), ConversionError> {
    let tenant = TenantObject::from_value(object)?;
    let direction = tenant.direction_to(desired_api_version)?;
    debug!("Converting tenant {} from {} to {} ({})", tenant.name(), tenant.api_version(), desired_api_version, direction);
    Ok((tenant, direction))
}

#[cfg(test)]
#[path = "server_test.rs"]
mod server_test;
