use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const NO_IMAGE_MESSAGE: &str = "No image provided";
pub const UPSTREAM_MESSAGE: &str = "PapaJi thak gaye, try again!";
pub const PARSE_MESSAGE: &str = "PapaJi confused ho gaye!";
pub const INTERNAL_MESSAGE: &str = "Kuch toh gadbad hai! Try again.";

/// Failures of the diagnose endpoint. Whatever a variant carries is for the
/// server log only; the client always gets one of the fixed messages above.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no image provided")]
    Validation,

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("no JSON object in model reply")]
    Parse,

    #[error("model reply is not a diagnosis: {0}")]
    Schema(String),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Validation => NO_IMAGE_MESSAGE,
            AppError::Upstream(_) => UPSTREAM_MESSAGE,
            AppError::Parse | AppError::Schema(_) => PARSE_MESSAGE,
            AppError::Internal(_) => INTERNAL_MESSAGE,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation => tracing::debug!("rejected diagnose request without image"),
            other => tracing::error!(error = %other, "diagnosis failed"),
        }

        (
            self.status(),
            Json(ErrorResponse {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}
