use account::GenerationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const INVALID_SYNC_DATA: &str = "Invalid data received";
pub const INVALID_DYNAMIC_DATA: &str = "Invalid dynamic data received";
pub const ACCOUNT_NOT_FOUND: &str = "Account not found";
pub const NO_STRATEGY_AVAILABLE: &str = "Account not found or no strategy available";
pub const GENERATION_FAILED: &str = "Failed to generate strategy";

/// Everything a handler can answer with besides a 200.
///
/// Rendered as `{"error": <message>}`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or mistyped required field (400).
    #[error("{0}")]
    Validation(String),

    /// Unknown account, or nothing to return for it yet (404).
    #[error("{0}")]
    NotFound(String),

    /// The strategy generator failed (500).
    #[error("Failed to generate strategy: {0}")]
    Generation(#[from] GenerationError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Generator internals stay in the logs.
        let message = match self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Generation(_) => GENERATION_FAILED.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
