use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::scoring::{ScoringError, ScoringService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub scoring: Arc<ScoringService>,
}

impl AppState {
    pub fn new(scoring: Arc<ScoringService>) -> Self {
        Self { scoring }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<ScoringError> for AppError {
    fn from(e: ScoringError) -> Self {
        match e {
            ScoringError::NotFound(msg) => AppError::NotFound(msg),
            ScoringError::InvalidInput(msg) => AppError::BadRequest(msg),
            ScoringError::InvalidState(msg) => AppError::Conflict(msg),
            ScoringError::ConcurrencyConflict(_) => AppError::Conflict(e.to_string()),
            ScoringError::Persistence(msg) => AppError::StorageError(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::StorageError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_errors_map_to_http_statuses() {
        let cases = [
            (
                AppError::from(ScoringError::NotFound("m1".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(ScoringError::InvalidInput("runs".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ScoringError::InvalidState("toss".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(ScoringError::ConcurrencyConflict("m1".into())),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(ScoringError::Persistence("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
