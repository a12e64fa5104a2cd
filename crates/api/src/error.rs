//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::ShipmentError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Shipment service error.
    Shipment(ShipmentError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Shipment(err) => shipment_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn shipment_error_to_response(err: ShipmentError) -> (StatusCode, String) {
    match &err {
        ShipmentError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        ShipmentError::RelationMissing => (StatusCode::BAD_REQUEST, err.to_string()),
        ShipmentError::Save(_) | ShipmentError::Update(_) | ShipmentError::Delete(_) => {
            tracing::error!(error = %err, "persistence failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        ShipmentError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<ShipmentError> for ApiError {
    fn from(err: ShipmentError) -> Self {
        ApiError::Shipment(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
