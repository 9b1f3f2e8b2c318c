//! Text layout: characters to positioned glyph outlines

use crate::typeface::{Font, OutlineCommand};
use glam::Vec2;

/// Glyph used when a character has no glyph in the font
const FALLBACK_CHAR: char = '?';

/// Text layout parameters
#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    /// Em size in world units
    pub size: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { size: 0.8 }
    }
}

/// A glyph outline placed in world units
#[derive(Debug, Clone)]
pub struct GlyphOutline {
    /// The character this outline was laid out for
    pub ch: char,
    pub commands: Vec<OutlineCommand>,
}

impl Font {
    /// Distance between baselines in world units for a given em size
    pub fn line_height(&self, size: f32) -> f32 {
        (self.y_max - self.y_min + self.underline_thickness) * (size / self.resolution)
    }

    /// Lay out `text` left to right, starting at the origin.
    ///
    /// `\n` starts a new line below the current one. Characters without a
    /// glyph use the `?` glyph, or are skipped when the font has none.
    /// Glyphs with no outline (whitespace) only advance the pen.
    pub fn layout(&self, text: &str, options: &LayoutOptions) -> Vec<GlyphOutline> {
        let scale = options.size / self.resolution;
        let line_height = self.line_height(options.size);

        let mut outlines = Vec::new();
        let mut pen = Vec2::ZERO;

        for ch in text.chars() {
            if ch == '\n' {
                pen.x = 0.0;
                pen.y -= line_height;
                continue;
            }

            let Some(glyph) = self.glyph(ch).or_else(|| self.glyph(FALLBACK_CHAR)) else {
                tracing::warn!(character = %ch.escape_debug(), font = %self.family_name, "no glyph for character, skipping");
                continue;
            };

            if !glyph.commands.is_empty() {
                outlines.push(GlyphOutline {
                    ch,
                    commands: glyph
                        .commands
                        .iter()
                        .map(|c| c.transformed(scale, pen))
                        .collect(),
                });
            }

            pen.x += glyph.advance * scale;
        }

        outlines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: &str = r#"{
        "glyphs": {
            "I": {"ha": 300, "o": "m 0 0 l 0 700 l 200 700 l 200 0 l 0 0"},
            "?": {"ha": 400, "o": "m 0 0 l 0 100 l 100 100 l 100 0"},
            " ": {"ha": 250}
        },
        "resolution": 1000,
        "boundingBox": {"yMin": -200, "yMax": 900},
        "underlineThickness": 100
    }"#;

    fn first_point(outline: &GlyphOutline) -> Vec2 {
        match outline.commands[0] {
            OutlineCommand::MoveTo(p) => p,
            other => panic!("expected move, got {:?}", other),
        }
    }

    #[test]
    fn test_advance_and_scale() {
        let font = Font::from_json_str(FONT).unwrap();
        let outlines = font.layout("I I", &LayoutOptions { size: 1.0 });
        assert_eq!(outlines.len(), 2);
        assert_eq!(first_point(&outlines[0]), Vec2::new(0.0, 0.0));
        // 300 (I) + 250 (space) font units at 1/1000
        assert!((first_point(&outlines[1]).x - 0.55).abs() < 1e-6);
        match outlines[0].commands[2] {
            OutlineCommand::LineTo(p) => assert!((p - Vec2::new(0.2, 0.7)).length() < 1e-6),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_newline_moves_down() {
        let font = Font::from_json_str(FONT).unwrap();
        let outlines = font.layout("I\nI", &LayoutOptions { size: 1.0 });
        assert_eq!(outlines.len(), 2);
        let second = first_point(&outlines[1]);
        assert_eq!(second.x, 0.0);
        // (900 - -200 + 100) / 1000
        assert!((second.y + 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_missing_glyph_falls_back_to_question_mark() {
        let font = Font::from_json_str(FONT).unwrap();
        let outlines = font.layout("Z", &LayoutOptions::default());
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].ch, 'Z');
        assert_eq!(outlines[0].commands.len(), 4);
    }

    #[test]
    fn test_missing_glyph_without_fallback_is_skipped() {
        let no_fallback = FONT.replace("\"?\"", "\"J\"");
        let font = Font::from_json_str(&no_fallback).unwrap();
        let outlines = font.layout("ZI", &LayoutOptions { size: 1.0 });
        assert_eq!(outlines.len(), 1);
        // skipped glyph does not advance the pen
        assert_eq!(first_point(&outlines[0]).x, 0.0);
    }

    #[test]
    fn test_whitespace_only_text() {
        let font = Font::from_json_str(FONT).unwrap();
        assert!(font.layout("   ", &LayoutOptions::default()).is_empty());
    }
}
