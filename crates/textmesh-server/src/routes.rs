//! Route handlers

use crate::error::{ApiError, INVALID_TEXT_MESSAGE};
use crate::pipeline::{generate_artifact, PipelineError};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use textmesh_core::GenerationRequest;
use textmesh_publish::{PublishedArtifact, Publisher};
use tokio::task::JoinHandle;

const LANDING_PAGE: &str = include_str!("../static/index.html");

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub start_time: String,
}

/// `POST /generate-text`
pub async fn generate_text(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected request body");
        ApiError::BadRequest(INVALID_TEXT_MESSAGE.to_string())
    })?;
    let request = GenerationRequest::from_json(&body, state.config.generation.max_text_chars)?;
    tracing::info!(text = %request.text, depth = request.depth, animate = request.animate, "generating label");

    let fonts = Arc::clone(&state.fonts);
    let publisher = Arc::clone(&state.publisher);
    let animation_secs = state.config.generation.animation_duration_secs;
    let job = request.clone();
    let mut task = tokio::task::spawn_blocking(move || {
        generate_artifact(fonts.as_ref(), publisher.as_ref(), &job, animation_secs)
    });

    let outcome = match tokio::time::timeout(state.config.generation_timeout(), &mut task).await {
        Ok(joined) => joined,
        Err(_) => {
            tracing::error!(text = %request.text, timeout_secs = state.config.generation.timeout_secs, "generation timed out");
            tokio::spawn(withdraw_late_artifact(task, Arc::clone(&state.publisher)));
            return Err(ApiError::Timeout);
        }
    };

    match outcome {
        Ok(Ok(artifact)) => Ok(Json(GenerateResponse { uri: artifact.uri })),
        Ok(Err(err)) => {
            tracing::error!(text = %request.text, phase = %err.phase, error = %err.source, "generation failed");
            Err(err.into())
        }
        Err(join_err) => {
            tracing::error!(text = %request.text, error = %join_err, "generation task panicked");
            Err(ApiError::Internal)
        }
    }
}

/// The blocking job cannot be cancelled, so an artifact it publishes after
/// the client was told about the timeout is removed again.
async fn withdraw_late_artifact(
    task: JoinHandle<Result<PublishedArtifact, PipelineError>>,
    publisher: Arc<dyn Publisher>,
) {
    let Ok(Ok(artifact)) = task.await else {
        return;
    };
    tracing::warn!(filename = %artifact.filename, "withdrawing artifact finished after timeout");
    let filename = artifact.filename;
    match tokio::task::spawn_blocking(move || publisher.remove(&filename)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!(error = %err, "could not withdraw late artifact"),
        Err(join_err) => tracing::error!(error = %join_err, "withdraw task panicked"),
    }
}

/// `GET /list-files`
pub async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let publisher = Arc::clone(&state.publisher);
    match tokio::task::spawn_blocking(move || publisher.list()).await {
        Ok(Ok(names)) => Ok(Json(names)),
        Ok(Err(err)) => {
            tracing::error!(error = %err, "could not list artifacts");
            Err(ApiError::ListFailed)
        }
        Err(join_err) => {
            tracing::error!(error = %join_err, "listing task panicked");
            Err(ApiError::ListFailed)
        }
    }
}

/// `GET /status`
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        message: "Server is running.",
        start_time: state.started_at.to_string(),
    })
}

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
