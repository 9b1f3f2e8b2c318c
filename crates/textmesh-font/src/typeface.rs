//! Typeface JSON font parsing
//!
//! A typeface file is a JSON document with a `glyphs` table keyed by
//! character. Each glyph has an advance width (`ha`) and an outline string
//! `o` made of whitespace-separated commands in font units:
//!
//! - `m x y` - move to
//! - `l x y` - line to
//! - `q x y cx cy` - quadratic curve to (x, y) with control point (cx, cy)
//! - `b x y c1x c1y c2x c2y` - cubic curve to (x, y) with two control points
//!
//! Note that curve commands list the end point *before* the control points.

use glam::Vec2;
use serde::Deserialize;
use std::collections::HashMap;
use textmesh_core::{Result, TextMeshError};

/// One outline drawing command, in font units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

impl OutlineCommand {
    /// Apply `p * scale + offset` to every point of the command
    pub fn transformed(&self, scale: f32, offset: Vec2) -> Self {
        let t = |p: Vec2| p * scale + offset;
        match *self {
            OutlineCommand::MoveTo(p) => OutlineCommand::MoveTo(t(p)),
            OutlineCommand::LineTo(p) => OutlineCommand::LineTo(t(p)),
            OutlineCommand::QuadTo { ctrl, to } => OutlineCommand::QuadTo {
                ctrl: t(ctrl),
                to: t(to),
            },
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => OutlineCommand::CubicTo {
                ctrl1: t(ctrl1),
                ctrl2: t(ctrl2),
                to: t(to),
            },
        }
    }
}

/// A parsed glyph
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Horizontal advance in font units
    pub advance: f32,
    /// Outline commands in font units (empty for whitespace)
    pub commands: Vec<OutlineCommand>,
}

/// A parsed typeface font
#[derive(Debug, Clone)]
pub struct Font {
    pub family_name: String,
    /// Font units per em
    pub resolution: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub underline_thickness: f32,
    glyphs: HashMap<char, Glyph>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypefaceFile {
    glyphs: HashMap<String, GlyphEntry>,
    #[serde(default)]
    family_name: Option<String>,
    resolution: f32,
    bounding_box: BoundingBoxEntry,
    #[serde(default)]
    underline_thickness: f32,
}

#[derive(Deserialize)]
struct GlyphEntry {
    #[serde(default)]
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundingBoxEntry {
    y_min: f32,
    y_max: f32,
}

impl Font {
    /// Parse a typeface JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: TypefaceFile = serde_json::from_str(json)
            .map_err(|e| TextMeshError::FontParse(format!("Invalid typeface JSON: {}", e)))?;
        Self::from_file(file)
    }

    /// Parse a typeface JSON document from raw bytes
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let file: TypefaceFile = serde_json::from_slice(bytes)
            .map_err(|e| TextMeshError::FontParse(format!("Invalid typeface JSON: {}", e)))?;
        Self::from_file(file)
    }

    fn from_file(file: TypefaceFile) -> Result<Self> {
        if !(file.resolution.is_finite() && file.resolution > 0.0) {
            return Err(TextMeshError::FontParse(format!(
                "Font resolution must be positive, got {}",
                file.resolution
            )));
        }

        let mut glyphs = HashMap::with_capacity(file.glyphs.len());
        for (key, entry) in file.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                continue;
            };
            let commands = match entry.o.as_deref() {
                Some(o) => parse_outline(o).map_err(|e| {
                    TextMeshError::FontParse(format!("Glyph '{}': {}", ch, e))
                })?,
                None => Vec::new(),
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance: entry.ha,
                    commands,
                },
            );
        }

        Ok(Self {
            family_name: file.family_name.unwrap_or_else(|| "unknown".to_string()),
            resolution: file.resolution,
            y_min: file.bounding_box.y_min,
            y_max: file.bounding_box.y_max,
            underline_thickness: file.underline_thickness,
            glyphs,
        })
    }

    /// Look up the glyph for a character
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Number of glyphs in the font
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// Parse a glyph outline command string
fn parse_outline(o: &str) -> std::result::Result<Vec<OutlineCommand>, String> {
    let mut tokens = o.split_whitespace();
    let mut commands = Vec::new();

    while let Some(op) = tokens.next() {
        let command = match op {
            "m" => OutlineCommand::MoveTo(next_point(&mut tokens, op)?),
            "l" => OutlineCommand::LineTo(next_point(&mut tokens, op)?),
            "q" => {
                let to = next_point(&mut tokens, op)?;
                let ctrl = next_point(&mut tokens, op)?;
                OutlineCommand::QuadTo { ctrl, to }
            }
            "b" => {
                let to = next_point(&mut tokens, op)?;
                let ctrl1 = next_point(&mut tokens, op)?;
                let ctrl2 = next_point(&mut tokens, op)?;
                OutlineCommand::CubicTo { ctrl1, ctrl2, to }
            }
            other => return Err(format!("unknown outline command '{}'", other)),
        };
        commands.push(command);
    }

    Ok(commands)
}

fn next_point<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    op: &str,
) -> std::result::Result<Vec2, String> {
    let mut coord = || -> std::result::Result<f32, String> {
        let tok = tokens
            .next()
            .ok_or_else(|| format!("'{}' command is missing coordinates", op))?;
        tok.parse::<f32>()
            .map_err(|_| format!("invalid coordinate '{}' in '{}' command", tok, op))
    };
    let x = coord()?;
    let y = coord()?;
    Ok(Vec2::new(x, y))
}
