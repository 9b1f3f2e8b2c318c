//! Font providers
//!
//! The generation pipeline never touches the network directly; it asks a
//! `FontProvider` for a parsed font. The HTTP provider re-fetches the font on
//! every call so each request is independent of the ones before it.

use crate::typeface::Font;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use textmesh_core::{Result, TextMeshError};

/// Font fetched when no other URL is configured
pub const DEFAULT_FONT_URL: &str =
    "https://threejs.org/examples/fonts/helvetiker_regular.typeface.json";

/// Default global timeout for a font fetch
pub const DEFAULT_FONT_TIMEOUT_SECS: u64 = 30;

/// Source of the font used for text generation
pub trait FontProvider: Send + Sync {
    /// Short description for logs (URL, file path, ...)
    fn describe(&self) -> String;

    /// Load and parse the font. Blocks on I/O.
    fn load(&self) -> Result<Arc<Font>>;
}

/// Fetches a typeface JSON font over HTTP on every `load`
pub struct HttpFontProvider {
    url: String,
    timeout: Duration,
}

impl HttpFontProvider {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    fn fetch_bytes(&self) -> Result<Vec<u8>> {
        let agent = build_agent(self.timeout);
        let mut response = agent.get(&self.url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => {
                TextMeshError::FontFetch(format!("HTTP {} from {}", code, self.url))
            }
            other => TextMeshError::FontFetch(format!("Request to {} failed: {}", self.url, other)),
        })?;

        response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TextMeshError::FontFetch(format!("Failed to read font body: {}", e)))
    }
}

impl FontProvider for HttpFontProvider {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Arc<Font>> {
        let bytes = self.fetch_bytes()?;
        tracing::debug!(url = %self.url, bytes = bytes.len(), "font fetched");
        // A body that does not parse means the upstream served something else
        let font = Font::from_json_slice(&bytes).map_err(|e| {
            TextMeshError::FontFetch(format!("Invalid font served by {}: {}", self.url, e))
        })?;
        Ok(Arc::new(font))
    }
}

/// Serves an already-parsed font
pub struct StaticFontProvider {
    font: Arc<Font>,
    label: String,
}

impl StaticFontProvider {
    pub fn new(font: Font, label: impl Into<String>) -> Self {
        Self {
            font: Arc::new(font),
            label: label.into(),
        }
    }
}

impl FontProvider for StaticFontProvider {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn load(&self) -> Result<Arc<Font>> {
        Ok(Arc::clone(&self.font))
    }
}

/// Read and parse a typeface JSON file from disk
pub fn load_font_file<P: AsRef<Path>>(path: P) -> Result<Font> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    Font::from_json_str(&content)
        .map_err(|e| TextMeshError::FontParse(format!("{}: {}", path.display(), e)))
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    config.into()
}
