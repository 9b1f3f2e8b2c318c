//! textmesh font - Glyph outlines for extruded text
//!
//! Loads fonts in the typeface JSON format (glyph outlines stored as
//! `m`/`l`/`q`/`b` command strings), lays text out into positioned glyph
//! outlines, and provides the `FontProvider` seam the generation pipeline
//! fetches fonts through.

mod layout;
mod provider;
mod typeface;

pub use layout::{GlyphOutline, LayoutOptions};
pub use provider::{
    load_font_file, FontProvider, HttpFontProvider, StaticFontProvider, DEFAULT_FONT_TIMEOUT_SECS,
    DEFAULT_FONT_URL,
};
pub use typeface::{Font, Glyph, OutlineCommand};
