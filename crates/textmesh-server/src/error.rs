//! HTTP error responses

use crate::pipeline::{Phase, PipelineError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use textmesh_core::TextMeshError;

/// Body sent for a request body that is not a JSON object with a string `text`
pub const INVALID_TEXT_MESSAGE: &str = "Missing or invalid \"text\" in request body";

/// An error as the client sees it: a status code and a short message.
/// Details stay in the logs.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Generation(Phase),
    Internal,
    Timeout,
    ListFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Generation(phase) => phase.public_message(),
            ApiError::Internal => "Server error",
            ApiError::Timeout => "Generation timed out",
            ApiError::ListFailed => "Failed to list files",
        }
    }
}

impl From<TextMeshError> for ApiError {
    fn from(err: TextMeshError) -> Self {
        match err {
            TextMeshError::Validation(msg) => ApiError::BadRequest(msg),
            _ => ApiError::Internal,
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Generation(err.phase)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
