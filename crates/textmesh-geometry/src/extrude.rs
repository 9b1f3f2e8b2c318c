//! Beveled extrusion of glyph outlines
//!
//! The solid for each glyph is built from a stack of offset rings. With
//! `bevel_segments = n` there are `n + 1` front rings and `n + 1` back rings:
//!
//! ```text
//! t      = b / n                  (b = 0..=n)
//! offset = bevel_size * sin(t * pi/2) + bevel_offset
//! z      = -bevel_thickness * cos(t * pi/2)            front
//! z      = depth + bevel_thickness * cos(t * pi/2)     back
//! ```
//!
//! Consecutive rings are joined by side quads and the outermost rings are
//! closed by caps filled with lyon's tessellator.

use crate::contour::{classify_rings, flatten_outline, miter_normals, Contour};
use crate::mesh::MeshData;
use glam::{Vec2, Vec3};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use std::f32::consts::FRAC_PI_2;
use textmesh_core::{Result, TextMeshError};
use textmesh_font::GlyphOutline;

/// Extrusion and bevel parameters, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeOptions {
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    /// Zero disables the bevel
    pub bevel_segments: u32,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: textmesh_core::DEFAULT_DEPTH,
            curve_segments: 20,
            bevel_thickness: 0.025,
            bevel_size: 0.025,
            bevel_offset: 0.0,
            bevel_segments: 5,
        }
    }
}

impl ExtrudeOptions {
    fn validate(&self) -> Result<()> {
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(TextMeshError::Geometry(format!(
                "Extrusion depth must be positive, got {}",
                self.depth
            )));
        }
        let bevel = [self.bevel_thickness, self.bevel_size, self.bevel_offset];
        if bevel.iter().any(|v| !v.is_finite()) || self.bevel_thickness < 0.0 {
            return Err(TextMeshError::Geometry(
                "Bevel parameters must be finite and thickness non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// `(z, offset)` for every ring from front to back
    fn layers(&self) -> Vec<(f32, f32)> {
        if self.bevel_segments == 0 {
            return vec![(0.0, self.bevel_offset), (self.depth, self.bevel_offset)];
        }

        let n = self.bevel_segments;
        let ring = |b: u32| {
            let angle = b as f32 / n as f32 * FRAC_PI_2;
            let offset = self.bevel_size * angle.sin() + self.bevel_offset;
            (self.bevel_thickness * angle.cos(), offset)
        };

        let front = (0..=n).map(|b| {
            let (dz, offset) = ring(b);
            (-dz, offset)
        });
        let back = (0..=n).rev().map(|b| {
            let (dz, offset) = ring(b);
            (self.depth + dz, offset)
        });
        front.chain(back).collect()
    }
}

/// Extrude laid-out glyph outlines into one closed, beveled mesh.
///
/// Each glyph is processed on its own so that overlapping neighbours do not
/// punch holes into each other's caps.
pub fn extrude_outlines(outlines: &[GlyphOutline], options: &ExtrudeOptions) -> Result<MeshData> {
    options.validate()?;
    let layers = options.layers();
    let mut mesh = MeshData::new();
    let mut tessellator = FillTessellator::new();

    for outline in outlines {
        let rings = flatten_outline(&outline.commands, options.curve_segments);
        if rings.is_empty() {
            continue;
        }
        let contours = classify_rings(rings);

        for contour in &contours {
            build_walls(&mut mesh, contour, &layers);
        }

        // Both caps sit on the first/last ring, which share the same offset
        let (front_z, cap_offset) = layers[0];
        let back_z = layers[layers.len() - 1].0;
        let cap_rings: Vec<Vec<Vec2>> = contours
            .iter()
            .map(|c| offset_ring(&c.points, &miter_normals(&c.points), cap_offset))
            .collect();
        build_caps(&mut tessellator, &mut mesh, &cap_rings, front_z, back_z)
            .map_err(|e| TextMeshError::Geometry(format!("Glyph '{}': {}", outline.ch, e)))?;
    }

    tracing::debug!(
        glyphs = outlines.len(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "extruded text outlines"
    );
    Ok(mesh)
}

fn offset_ring(points: &[Vec2], normals: &[Vec2], offset: f32) -> Vec<Vec2> {
    points
        .iter()
        .zip(normals)
        .map(|(p, n)| *p + *n * offset)
        .collect()
}

/// Side quads between consecutive rings of one contour
fn build_walls(mesh: &mut MeshData, contour: &Contour, layers: &[(f32, f32)]) {
    let normals = miter_normals(&contour.points);
    let rings: Vec<Vec<Vec3>> = layers
        .iter()
        .map(|&(z, offset)| {
            offset_ring(&contour.points, &normals, offset)
                .into_iter()
                .map(|p| p.extend(z))
                .collect()
        })
        .collect();

    let n = contour.points.len();
    for pair in rings.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        for i in 0..n {
            let j = (i + 1) % n;
            let (a, b, c, d) = (lower[i], lower[j], upper[j], upper[i]);
            push_face(mesh, a, b, c);
            push_face(mesh, a, c, d);
        }
    }
}

/// Push a triangle with its face normal; zero-area triangles are dropped
fn push_face(mesh: &mut MeshData, a: Vec3, b: Vec3, c: Vec3) {
    let normal = (b - a).cross(c - a);
    if normal.length_squared() <= f32::EPSILON * f32::EPSILON {
        return;
    }
    let normal = normal.normalize();
    mesh.push_triangle(a.to_array(), b.to_array(), c.to_array(), normal.to_array());
}

/// Fill front and back caps for one glyph
fn build_caps(
    tessellator: &mut FillTessellator,
    mesh: &mut MeshData,
    rings: &[Vec<Vec2>],
    front_z: f32,
    back_z: f32,
) -> std::result::Result<(), String> {
    let mut builder = Path::builder();
    for ring in rings {
        builder.begin(point(ring[0].x, ring[0].y));
        for p in &ring[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    let fill = FillOptions::default().with_fill_rule(FillRule::EvenOdd);
    tessellator
        .tessellate_path(
            &path,
            &fill,
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| v.position().to_array()),
        )
        .map_err(|e| format!("cap tessellation failed: {:?}", e))?;

    for tri in buffers.indices.chunks_exact(3) {
        let [mut a, mut b, c] = [0, 1, 2].map(|k| Vec2::from(buffers.vertices[tri[k] as usize]));
        let area = (b - a).perp_dot(c - a);
        if area.abs() <= f32::EPSILON {
            continue;
        }
        if area < 0.0 {
            std::mem::swap(&mut a, &mut b);
        }
        // counter-clockwise in xy faces +z
        mesh.push_triangle(
            a.extend(back_z).to_array(),
            b.extend(back_z).to_array(),
            c.extend(back_z).to_array(),
            [0.0, 0.0, 1.0],
        );
        mesh.push_triangle(
            b.extend(front_z).to_array(),
            a.extend(front_z).to_array(),
            c.extend(front_z).to_array(),
            [0.0, 0.0, -1.0],
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use textmesh_font::OutlineCommand;

    fn rect(ch: char, x0: f32, y0: f32, x1: f32, y1: f32) -> GlyphOutline {
        GlyphOutline {
            ch,
            commands: vec![
                OutlineCommand::MoveTo(Vec2::new(x0, y0)),
                OutlineCommand::LineTo(Vec2::new(x0, y1)),
                OutlineCommand::LineTo(Vec2::new(x1, y1)),
                OutlineCommand::LineTo(Vec2::new(x1, y0)),
            ],
        }
    }

    fn flat(depth: f32) -> ExtrudeOptions {
        ExtrudeOptions {
            depth,
            bevel_segments: 0,
            ..Default::default()
        }
    }

    /// Sum of signed tetrahedron volumes; positive for an outward-facing closed mesh
    fn signed_volume(mesh: &MeshData) -> f32 {
        mesh.indices
            .chunks_exact(3)
            .map(|t| {
                let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.positions[t[k] as usize]));
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }

    #[test]
    fn test_layers_without_bevel() {
        assert_eq!(flat(0.4).layers(), vec![(0.0, 0.0), (0.4, 0.0)]);
    }

    #[test]
    fn test_layers_with_bevel() {
        let opts = ExtrudeOptions::default();
        let layers = opts.layers();
        assert_eq!(layers.len(), 12);
        let (z0, o0) = layers[0];
        assert!((z0 + 0.025).abs() < 1e-6);
        assert!(o0.abs() < 1e-6);
        let (z5, o5) = layers[5];
        assert!(z5.abs() < 1e-6);
        assert!((o5 - 0.025).abs() < 1e-6);
        let (z_last, _) = layers[11];
        assert!((z_last - 0.425).abs() < 1e-6);
    }

    #[test]
    fn test_flat_box_extrusion() {
        let mesh = extrude_outlines(&[rect('x', 0.0, 0.0, 1.0, 2.0)], &flat(0.5)).unwrap();
        // 4 side quads + two caps of 2 triangles
        assert_eq!(mesh.triangle_count(), 12);
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min, [0.0, 0.0, 0.0]);
        assert_eq!(b.max, [1.0, 2.0, 0.5]);
        assert!((signed_volume(&mesh) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_bevel_expands_bounds() {
        let mesh = extrude_outlines(&[rect('x', 0.0, 0.0, 1.0, 1.0)], &ExtrudeOptions::default())
            .unwrap();
        let b = mesh.bounds().unwrap();
        assert!((b.min[0] + 0.025).abs() < 1e-5);
        assert!((b.max[1] - 1.025).abs() < 1e-5);
        assert!((b.min[2] + 0.025).abs() < 1e-5);
        assert!((b.max[2] - 0.425).abs() < 1e-5);
        assert!(signed_volume(&mesh) > 0.4);
    }

    #[test]
    fn test_side_normals_point_outward() {
        let mesh = extrude_outlines(&[rect('x', 0.0, 0.0, 1.0, 1.0)], &flat(1.0)).unwrap();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let to_vertex = Vec3::from(*p) - Vec3::new(0.5, 0.5, 0.5);
            assert!(to_vertex.dot(Vec3::from(*n)) > 0.0);
        }
    }

    #[test]
    fn test_hole_is_not_capped() {
        let mut ring = rect('o', 0.0, 0.0, 3.0, 3.0);
        let hole = rect('o', 1.0, 1.0, 2.0, 2.0);
        ring.commands.extend(hole.commands);
        let mesh = extrude_outlines(&[ring], &flat(1.0)).unwrap();
        // 3x3 square minus a 1x1 hole, 1 deep
        assert!((signed_volume(&mesh) - 8.0).abs() < 1e-3);
        let cap_area: f32 = mesh
            .indices
            .chunks_exact(3)
            .filter(|t| mesh.normals[t[0] as usize] == [0.0, 0.0, 1.0])
            .map(|t| {
                let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.positions[t[k] as usize]));
                (b - a).cross(c - a).length() * 0.5
            })
            .sum();
        assert!((cap_area - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_depth_rejected() {
        let outline = [rect('x', 0.0, 0.0, 1.0, 1.0)];
        assert!(extrude_outlines(&outline, &flat(0.0)).is_err());
        assert!(extrude_outlines(&outline, &flat(f32::NAN)).is_err());
    }

    #[test]
    fn test_no_outlines_gives_empty_mesh() {
        let mesh = extrude_outlines(&[], &ExtrudeOptions::default()).unwrap();
        assert!(mesh.is_empty());
    }
}
