//! Text to geometry

use crate::extrude::{extrude_outlines, ExtrudeOptions};
use crate::mesh::MeshData;
use textmesh_core::Result;
use textmesh_font::{Font, LayoutOptions};

/// Parameters for a text mesh. Defaults match the service's fixed look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextGeometryOptions {
    /// Em size in world units
    pub size: f32,
    pub extrude: ExtrudeOptions,
}

impl Default for TextGeometryOptions {
    fn default() -> Self {
        Self {
            size: 0.8,
            extrude: ExtrudeOptions::default(),
        }
    }
}

impl TextGeometryOptions {
    pub fn with_depth(depth: f32) -> Self {
        let mut options = Self::default();
        options.extrude.depth = depth;
        options
    }
}

/// Lay out `text`, extrude it and center it on x/y.
///
/// Whitespace-only text produces an empty mesh rather than an error.
pub fn build_text_geometry(font: &Font, text: &str, options: &TextGeometryOptions) -> Result<MeshData> {
    let outlines = font.layout(text, &LayoutOptions { size: options.size });
    let mut mesh = extrude_outlines(&outlines, &options.extrude)?;
    mesh.center_xy();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_font() -> Font {
        Font::from_json_str(include_str!("../../textmesh-font/tests/fixtures/mini.typeface.json"))
            .unwrap()
    }

    #[test]
    fn test_text_is_centered_on_xy() {
        let mesh = build_text_geometry(&fixture_font(), "Hi", &TextGeometryOptions::default()).unwrap();
        let b = mesh.bounds().unwrap();
        let c = b.center();
        assert!(c[0].abs() < 1e-5);
        assert!(c[1].abs() < 1e-5);
        // z keeps the bevel extent
        assert!((b.min[2] + 0.025).abs() < 1e-5);
        assert!((b.max[2] - 0.425).abs() < 1e-5);
    }

    #[test]
    fn test_depth_changes_z_extent() {
        let mesh = build_text_geometry(&fixture_font(), "l", &TextGeometryOptions::with_depth(1.0)).unwrap();
        let b = mesh.bounds().unwrap();
        assert!((b.max[2] - 1.025).abs() < 1e-5);
    }

    #[test]
    fn test_whitespace_gives_empty_mesh() {
        let mesh = build_text_geometry(&fixture_font(), "   ", &TextGeometryOptions::default()).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_unknown_characters_use_fallback() {
        let font = fixture_font();
        let opts = TextGeometryOptions::default();
        let unknown = build_text_geometry(&font, "#", &opts).unwrap();
        let question = build_text_geometry(&font, "?", &opts).unwrap();
        assert!(!unknown.is_empty());
        assert_eq!(unknown, question);
    }

    #[test]
    fn test_same_text_same_geometry() {
        let font = fixture_font();
        let opts = TextGeometryOptions::default();
        let a = build_text_geometry(&font, "HOl", &opts).unwrap();
        let b = build_text_geometry(&font, "HOl", &opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wider_text_is_wider() {
        let font = fixture_font();
        let opts = TextGeometryOptions::default();
        let one = build_text_geometry(&font, "H", &opts).unwrap().bounds().unwrap();
        let two = build_text_geometry(&font, "HH", &opts).unwrap().bounds().unwrap();
        assert!(two.size()[0] > one.size()[0]);
    }
}
