//! Mapping handler failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use launcher_common::ConfigError;
use thiserror::Error;

use crate::launcher::LaunchError;

/// Errors surfaced by request handlers.
///
/// Details are logged; the response body stays generic.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to launch instance")]
    Launch(#[from] LaunchError),

    #[error("launcher is misconfigured")]
    Config(#[from] ConfigError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Launch(LaunchError::Spawn { executable, source }) => {
                tracing::error!(%executable, error = %source, "instance launch failed");
            }
            ApiError::Config(err) => {
                tracing::error!(error = %err, "cannot launch instance");
            }
        }
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
