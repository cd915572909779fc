//! HTTP request handlers
//!
//! Axum handlers for the prediction API.

use crate::server::{
    parse_features, state::AppState, ApiError, HealthResponse, PredictionResponse,
};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error, warn};

/// Generate a request ID
fn request_id() -> String {
    format!("req-{:016x}", rand::random::<u64>())
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let health = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        input_width: state.service.model().input_width(),
    };

    (StatusCode::OK, Json(health))
}

/// Preprocess the posted records and predict their labels
///
/// Body rejections (such as an oversized body) are reported through
/// [`ApiError`] so every failure carries the JSON error shape.
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let req_id = request_id();

    let result = body
        .map_err(|e| ApiError::BodyRejected(e.body_text()))
        .and_then(|body| parse_features(&body))
        .and_then(|records| {
            debug!(request_id = %req_id, records = records.len(), "prediction request");
            let labels = state.service.predict(&records)?;
            PredictionResponse::from_labels(labels).ok_or(ApiError::NoRecords)
        });

    match result {
        Ok(response) => {
            debug!(request_id = %req_id, prediction = response.prediction, "prediction served");
            Ok(Json(response))
        }
        Err(e) if e.is_schema_error() => {
            warn!(request_id = %req_id, kind = e.kind(), status = %e.status(), "{e}");
            Err(e)
        }
        Err(e) => {
            error!(request_id = %req_id, kind = e.kind(), status = %e.status(), "{e}");
            Err(e)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
