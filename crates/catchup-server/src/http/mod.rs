mod routes;

pub use routes::create_router;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catchup_core::{CatchUpError, CatchUpService, Industry, TimePeriod};
use serde::Serialize;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CatchUpService>,
}

/// JSON error body: `{"error": "...", "details": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
}

/// Error type for HTTP handlers
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: String,
    details: String,
}

impl AppError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: details.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.error,
                details: self.details,
            }),
        )
            .into_response()
    }
}

impl From<CatchUpError> for AppError {
    fn from(err: CatchUpError) -> Self {
        match err {
            CatchUpError::InvalidIndustry(_) => AppError::bad_request(
                "Invalid industry",
                format!("Must be one of: {}", Industry::expected()),
            ),
            CatchUpError::InvalidTimePeriod(_) => AppError::bad_request(
                "Invalid time period",
                format!("Must be one of: {}", TimePeriod::expected()),
            ),
            CatchUpError::Generation(e) => AppError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate summary",
                e.to_string(),
            ),
            CatchUpError::Cache(msg) => {
                AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Cache error", msg)
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
