//! The text-to-artifact pipeline
//!
//! Font -> geometry -> GLB -> publish. Every step blocks, so the HTTP
//! handlers run this on the blocking pool. A failure carries the phase it
//! happened in; that phase alone decides what the client is told.

use std::fmt;
use textmesh_core::{GenerationRequest, TextMeshError};
use textmesh_font::{Font, FontProvider};
use textmesh_publish::{PublishedArtifact, Publisher};
use textmesh_scene::{build_text_scene, export_glb};
use thiserror::Error;

/// Pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Font,
    Geometry,
    Export,
    Publish,
}

impl Phase {
    /// Message returned to clients for a failure in this phase
    pub fn public_message(&self) -> &'static str {
        match self {
            Phase::Font | Phase::Geometry => "Server error",
            Phase::Export => "GLTF export failed",
            Phase::Publish => "Failed to write GLB",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Font => "font",
            Phase::Geometry => "geometry",
            Phase::Export => "export",
            Phase::Publish => "publish",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{phase} failed: {source}")]
pub struct PipelineError {
    pub phase: Phase,
    #[source]
    pub source: TextMeshError,
}

fn at(phase: Phase) -> impl FnOnce(TextMeshError) -> PipelineError {
    move |source| PipelineError { phase, source }
}

/// Build the scene for `request` and serialize it to GLB bytes
pub fn render_glb(
    font: &Font,
    request: &GenerationRequest,
    animation_secs: f32,
) -> Result<Vec<u8>, PipelineError> {
    let scene = build_text_scene(font, request, animation_secs).map_err(at(Phase::Geometry))?;
    export_glb(&scene).map_err(at(Phase::Export))
}

/// Run the whole pipeline for one request
pub fn generate_artifact(
    fonts: &dyn FontProvider,
    publisher: &dyn Publisher,
    request: &GenerationRequest,
    animation_secs: f32,
) -> Result<PublishedArtifact, PipelineError> {
    let font = fonts.load().map_err(at(Phase::Font))?;
    tracing::debug!(font = %fonts.describe(), glyphs = font.glyph_count(), "font loaded");

    let glb = render_glb(&font, request, animation_secs)?;
    let artifact = publisher.publish(&glb, &request.text).map_err(at(Phase::Publish))?;

    tracing::info!(
        text = %request.text,
        uri = %artifact.uri,
        bytes = artifact.size_bytes,
        hash = %artifact.content_hash,
        backend = publisher.name(),
        "label generated"
    );
    Ok(artifact)
}
