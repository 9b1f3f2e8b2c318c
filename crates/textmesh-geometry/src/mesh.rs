//! Triangle mesh data

use textmesh_core::MeshBounds;

/// Indexed triangle mesh with flat per-face normals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<MeshBounds> {
        MeshBounds::from_positions(&self.positions)
    }

    /// Append one flat-shaded triangle. UVs are planar in x/y.
    pub(crate) fn push_triangle(&mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3], normal: [f32; 3]) {
        let base = self.positions.len() as u32;
        for p in [a, b, c] {
            self.positions.push(p);
            self.normals.push(normal);
            self.uvs.push([p[0], p[1]]);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    /// Move every vertex by `offset`
    pub fn translate(&mut self, offset: [f32; 3]) {
        for p in &mut self.positions {
            p[0] += offset[0];
            p[1] += offset[1];
            p[2] += offset[2];
        }
    }

    /// Translate so the x/y midpoint of the bounds sits at the origin.
    /// Z is left alone.
    pub fn center_xy(&mut self) {
        if let Some(bounds) = self.bounds() {
            let c = bounds.center();
            self.translate([-c[0], -c[1], 0.0]);
        }
    }
}
