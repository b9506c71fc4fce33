use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(&'static str),

    #[error("Run is not in progress")]
    RunNotActive,

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Illegal state changes are conflicts, distinct from bad input.
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, *msg),
            AppError::RunNotActive => (StatusCode::CONFLICT, "Run is not in progress"),
            AppError::InvalidCoordinate(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            AppError::Internal => {
                error!("Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
