//! GLB inspection

use serde::Serialize;
use std::path::Path;
use textmesh_core::{MeshBounds, Result, TextMeshError};

/// Summary of a GLB file
#[derive(Debug, Clone, Serialize)]
pub struct GlbSummary {
    pub generator: Option<String>,
    pub mesh_count: usize,
    pub triangle_count: usize,
    pub vertex_count: usize,
    /// Combined bounds of all mesh positions, in mesh space
    pub bounds: Option<MeshBounds>,
    pub meshes: Vec<MeshNodeSummary>,
    pub animations: Vec<AnimationSummary>,
    pub extensions_used: Vec<String>,
}

/// A node carrying a mesh
#[derive(Debug, Clone, Serialize)]
pub struct MeshNodeSummary {
    pub name: Option<String>,
    pub scale: [f32; 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct AnimationSummary {
    pub name: Option<String>,
    pub duration: f32,
    pub channels: usize,
    pub keyframes: usize,
}

/// Parse and summarise GLB bytes
pub fn inspect_glb(bytes: &[u8]) -> Result<GlbSummary> {
    let (document, buffers, _images) = gltf::import_slice(bytes)
        .map_err(|e| TextMeshError::Inspect(format!("Failed to read glTF: {}", e)))?;

    let mut triangle_count = 0;
    let mut vertex_count = 0;
    let mut bounds: Option<MeshBounds> = None;

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();
            vertex_count += positions.len();

            if primitive.mode() == gltf::mesh::Mode::Triangles {
                let index_count = reader
                    .read_indices()
                    .map(|iter| iter.into_u32().count())
                    .unwrap_or(positions.len());
                triangle_count += index_count / 3;
            }

            if let Some(b) = MeshBounds::from_positions(&positions) {
                bounds = Some(match bounds {
                    Some(acc) => acc.union(&b),
                    None => b,
                });
            }
        }
    }

    let meshes = document
        .nodes()
        .filter(|node| node.mesh().is_some())
        .map(|node| {
            let (_, _, scale) = node.transform().decomposed();
            MeshNodeSummary {
                name: node.name().map(String::from),
                scale,
            }
        })
        .collect();

    let animations = document
        .animations()
        .map(|animation| {
            let mut duration = 0.0f32;
            let mut keyframes = 0;
            for channel in animation.channels() {
                let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
                if let Some(inputs) = reader.read_inputs() {
                    for t in inputs {
                        duration = duration.max(t);
                        keyframes += 1;
                    }
                }
            }
            AnimationSummary {
                name: animation.name().map(String::from),
                duration,
                channels: animation.channels().count(),
                keyframes,
            }
        })
        .collect();

    Ok(GlbSummary {
        generator: document.as_json().asset.generator.clone(),
        mesh_count: document.meshes().count(),
        triangle_count,
        vertex_count,
        bounds,
        meshes,
        animations,
        extensions_used: document.extensions_used().map(|e| e.to_string()).collect(),
    })
}

/// Read and summarise a GLB file from disk
pub fn inspect_glb_file<P: AsRef<Path>>(path: P) -> Result<GlbSummary> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    inspect_glb(&bytes).map_err(|e| match e {
        TextMeshError::Inspect(msg) => TextMeshError::Inspect(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_glb;
    use crate::scene::build_text_scene;
    use textmesh_core::GenerationRequest;
    use textmesh_font::Font;

    fn fixture_font() -> Font {
        Font::from_json_str(include_str!("../../textmesh-font/tests/fixtures/mini.typeface.json"))
            .unwrap()
    }

    fn summary(request: &GenerationRequest) -> GlbSummary {
        let scene = build_text_scene(&fixture_font(), request, 10.0).unwrap();
        inspect_glb(&export_glb(&scene).unwrap()).unwrap()
    }

    #[test]
    fn test_summary_of_animated_label() {
        let s = summary(&GenerationRequest::new("Hi"));
        assert_eq!(s.mesh_count, 1);
        assert!(s.triangle_count > 0);
        assert_eq!(s.meshes.len(), 1);
        assert_eq!(s.meshes[0].name.as_deref(), Some("AnimatedText"));
        assert_eq!(s.animations.len(), 1);
        assert_eq!(s.animations[0].name.as_deref(), Some("rotate"));
        assert_eq!(s.animations[0].keyframes, 5);
        assert!((s.animations[0].duration - 10.0).abs() < 1e-6);
        assert!(s.extensions_used.iter().any(|e| e == "KHR_lights_punctual"));
        assert!(s.generator.unwrap().starts_with("textmesh"));
    }

    #[test]
    fn test_bounds_centered_and_scale_recorded() {
        let s = summary(&GenerationRequest::new("HOl"));
        let c = s.bounds.unwrap().center();
        assert!(c[0].abs() < 1e-4);
        assert!(c[1].abs() < 1e-4);
        let expected = textmesh_core::text_scale("HOl");
        assert_eq!(s.meshes[0].scale, [expected; 3]);
    }

    #[test]
    fn test_still_label_has_no_animation() {
        let mut request = GenerationRequest::new("Hi");
        request.animate = false;
        assert!(summary(&request).animations.is_empty());
    }

    #[test]
    fn test_repeated_text_gives_same_geometry() {
        let a = summary(&GenerationRequest::new("Hi"));
        let b = summary(&GenerationRequest::new("Hi"));
        assert_eq!(a.triangle_count, b.triangle_count);
        assert_eq!(a.bounds, b.bounds);
    }

    #[test]
    fn test_garbage_rejected() {
        let err = inspect_glb(b"definitely not a glb").unwrap_err();
        assert!(matches!(err, TextMeshError::Inspect(_)));
    }

    #[test]
    fn test_inspect_file() {
        let dir = std::env::temp_dir().join(format!("textmesh_inspect_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("label.glb");
        let scene = build_text_scene(&fixture_font(), &GenerationRequest::new("l"), 2.0).unwrap();
        std::fs::write(&path, export_glb(&scene).unwrap()).unwrap();

        let s = inspect_glb_file(&path).unwrap();
        assert_eq!(s.mesh_count, 1);
        assert!(inspect_glb_file(dir.join("missing.glb")).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
