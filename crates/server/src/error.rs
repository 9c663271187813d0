//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, ApiError>`; the engine's typed results are mapped here and
//! nowhere else.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use statewise_engine::CartError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Cart mutation failed (unknown product, bad quantity).
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing, unknown, or expired session token.
    ///
    /// Deliberately covers all three miss causes with one variant: the
    /// caller cannot tell a never-issued token from a deleted or expired
    /// one.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Cart(CartError::ProductNotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::InvalidQuantity(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
