//! Request body parsing and the boundary error type

use super::ErrorResponse;
use crate::preprocess::FeatureRecord;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use thiserror::Error;

/// Message returned when the body has no `features` field
pub const MISSING_FEATURES: &str = "Missing features field in the request";

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not an object with a `features` key
    #[error("Missing features field in the request")]
    MissingFeatures,

    /// Body is not valid JSON
    #[error("Malformed JSON body: {0}")]
    MalformedBody(String),

    /// Body could not be read, e.g. it exceeds the configured size limit
    #[error("Request body rejected: {0}")]
    BodyRejected(String),

    /// `features` is not a record or a list of records
    #[error("Invalid features field: {0}")]
    InvalidFeatures(String),

    /// `features` is an empty list
    #[error("No records in features field")]
    NoRecords,

    /// Preprocessing or prediction failure
    #[error(transparent)]
    Core(#[from] crate::Error),
}

impl ApiError {
    /// HTTP status for this error.
    ///
    /// Only a missing `features` field is a client error; everything else is
    /// reported as a server error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFeatures => StatusCode::BAD_REQUEST,
            Self::MalformedBody(_)
            | Self::BodyRejected(_)
            | Self::InvalidFeatures(_)
            | Self::NoRecords
            | Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the request carried a record the preprocessor cannot encode
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_schema_error())
    }

    /// Short machine-readable kind for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFeatures => "missing_features",
            Self::MalformedBody(_) => "malformed_body",
            Self::BodyRejected(_) => "body_rejected",
            Self::InvalidFeatures(_) => "invalid_features",
            Self::NoRecords => "no_records",
            Self::Core(e) => e.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Extract the feature records from a raw request body.
///
/// `features` may hold a single record object or a list of them.
pub fn parse_features(body: &[u8]) -> Result<Vec<FeatureRecord>, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;

    let features = match value {
        Value::Object(mut map) => map.remove("features").ok_or(ApiError::MissingFeatures)?,
        _ => return Err(ApiError::MissingFeatures),
    };

    let records: Vec<FeatureRecord> = match features {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item)
                    .map_err(|e| ApiError::InvalidFeatures(format!("record {i}: {e}")))
            })
            .collect::<Result<_, _>>()?,
        Value::Object(_) => vec![serde_json::from_value(features)
            .map_err(|e| ApiError::InvalidFeatures(e.to_string()))?],
        other => {
            return Err(ApiError::InvalidFeatures(format!(
                "expected an object or a list of objects, got {other}"
            )))
        }
    };

    if records.is_empty() {
        return Err(ApiError::NoRecords);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::RawValue;

    #[test]
    fn test_parse_record_list() {
        let body = br#"{"features": [{"Sex": "Male", "BMI": 27.1}, {"Sex": "Female", "BMI": 22}]}"#;
        let records = parse_features(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["BMI"], RawValue::Number(22.0));
    }

    #[test]
    fn test_parse_single_record_object() {
        let body = br#"{"features": {"Sex": "Male"}}"#;
        let records = parse_features(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Sex"], RawValue::from("Male"));
    }

    #[test]
    fn test_missing_features_is_bad_request() {
        let err = parse_features(b"{}").unwrap_err();
        assert!(matches!(err, ApiError::MissingFeatures));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), MISSING_FEATURES);
    }

    #[test]
    fn test_non_object_body_is_missing_features() {
        assert!(matches!(parse_features(b"[1, 2]"), Err(ApiError::MissingFeatures)));
    }

    #[test]
    fn test_malformed_json_is_server_error() {
        let err = parse_features(b"{\"features\": ").unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_scalar_features_rejected() {
        let err = parse_features(br#"{"features": 3}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidFeatures(_)));
    }

    #[test]
    fn test_non_object_record_rejected() {
        let err = parse_features(br#"{"features": [{"Sex": "Male"}, "oops"]}"#).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_empty_record_list_rejected() {
        assert!(matches!(parse_features(br#"{"features": []}"#), Err(ApiError::NoRecords)));
    }

    #[test]
    fn test_body_rejection_is_server_error() {
        let err = ApiError::BodyRejected("length limit exceeded".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_schema_error());
    }

    #[test]
    fn test_schema_errors_are_flagged() {
        let err = ApiError::from(crate::Error::MissingColumn { column: "BMI".into() });
        assert!(err.is_schema_error());
        let err = ApiError::from(crate::Error::ShapeMismatch { expected: 18, actual: 17 });
        assert!(!err.is_schema_error());
    }

    #[test]
    fn test_core_error_is_server_error() {
        let err = ApiError::from(crate::Error::MissingColumn { column: "BMI".into() });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), "E001");
        assert!(err.to_string().contains("BMI"));
    }
}
