//! Generate a label GLB without running the server

use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;
use textmesh_core::{ContentHash, GenerationRequest};
use textmesh_font::{load_font_file, Font, FontProvider, HttpFontProvider};
use textmesh_publish::artifact_filename;

pub struct GenerateArgs {
    pub text: String,
    pub depth: f32,
    pub animate: bool,
    pub font: Option<String>,
    pub output: Option<String>,
    pub config: Option<String>,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    // Same rules as the HTTP endpoint
    let body = json!({ "text": args.text, "depth": args.depth, "animate": args.animate });
    let request = GenerationRequest::from_json(&body, config.generation.max_text_chars)?;

    let font: Arc<Font> = match &args.font {
        Some(path) => Arc::new(
            load_font_file(path).with_context(|| format!("Failed to load font '{}'", path))?,
        ),
        None => {
            let provider = HttpFontProvider::new(config.font.url.clone(), config.font_timeout());
            println!("Fetching font from {}", provider.describe());
            provider.load().context("Failed to fetch font")?
        }
    };

    tracing::debug!(glyphs = font.glyph_count(), depth = request.depth, animate = request.animate, "rendering label");
    let glb = textmesh_server::render_glb(&font, &request, config.generation.animation_duration_secs)?;

    let output = args
        .output
        .unwrap_or_else(|| artifact_filename(&request.text));
    std::fs::write(&output, &glb).with_context(|| format!("Failed to write '{}'", output))?;

    println!("Generated label for \"{}\"", request.text);
    println!("  Output:    {}", output);
    println!("  Size:      {} bytes", glb.len());
    println!("  Depth:     {}", request.depth);
    println!("  Animated:  {}", if request.animate { "yes" } else { "no" });
    println!("  Hash:      {}", ContentHash::from_bytes(&glb).to_prefixed_hex());

    Ok(())
}
