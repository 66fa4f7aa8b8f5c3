use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::utils::graph::RenderError;

/// Errors that make it all the way back to the HTTP client.
///
/// Model and parsing problems never show up here, they are absorbed by the fallback.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to generate chart: {0}")]
    Render(#[from] RenderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("[HTTP] {}", self);

        let status = match self {
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
