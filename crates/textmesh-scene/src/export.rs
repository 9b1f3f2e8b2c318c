//! Binary glTF (GLB) export
//!
//! The document is assembled with `serde_json` and packed with the BIN
//! chunk by hand: a 12-byte header, a space-padded JSON chunk and a
//! zero-padded binary chunk, each 4-byte aligned.

use crate::animation::AnimationClip;
use crate::scene::{DirectionalLight, TextMesh, TextScene};
use glam::{Quat, Vec3};
use serde_json::{json, Value};
use textmesh_core::{Result, TextMeshError};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const MODE_POINTS: u32 = 0;
const MODE_TRIANGLES: u32 = 4;

const LIGHTS_EXTENSION: &str = "KHR_lights_punctual";

/// Collects binary data, buffer views and accessors
#[derive(Default)]
struct BufferBuilder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl BufferBuilder {
    fn push_view(&mut self, bytes: &[u8], target: Option<u32>) -> usize {
        // every element type used here is 4 bytes wide
        let padded = (self.bin.len() + 3) & !3;
        self.bin.resize(padded, 0);

        let mut view = json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
        });
        if let Some(target) = target {
            view["target"] = json!(target);
        }
        self.bin.extend_from_slice(bytes);
        self.views.push(view);
        self.views.len() - 1
    }

    fn push_accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn vec3(&mut self, data: &[[f32; 3]], with_bounds: bool) -> usize {
        let view = self.push_view(&f32_bytes(data.iter().flatten()), Some(ARRAY_BUFFER));
        let mut accessor = json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": data.len(),
            "type": "VEC3",
        });
        if with_bounds {
            if let Some(bounds) = textmesh_core::MeshBounds::from_positions(data) {
                accessor["min"] = json!(bounds.min);
                accessor["max"] = json!(bounds.max);
            }
        }
        self.push_accessor(accessor)
    }

    fn vec2(&mut self, data: &[[f32; 2]]) -> usize {
        let view = self.push_view(&f32_bytes(data.iter().flatten()), Some(ARRAY_BUFFER));
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": data.len(),
            "type": "VEC2",
        }))
    }

    fn indices(&mut self, data: &[u32]) -> usize {
        let bytes: Vec<u8> = data.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, Some(ELEMENT_ARRAY_BUFFER));
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": UNSIGNED_INT,
            "count": data.len(),
            "type": "SCALAR",
        }))
    }

    fn animation_input(&mut self, times: &[f32]) -> usize {
        let view = self.push_view(&f32_bytes(times.iter()), None);
        let min = times.iter().copied().fold(f32::INFINITY, f32::min);
        let max = times.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": times.len(),
            "type": "SCALAR",
            "min": [min],
            "max": [max],
        }))
    }

    fn animation_rotations(&mut self, rotations: &[[f32; 4]]) -> usize {
        let view = self.push_view(&f32_bytes(rotations.iter().flatten()), None);
        self.push_accessor(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": rotations.len(),
            "type": "VEC4",
        }))
    }
}

fn f32_bytes<'a>(values: impl Iterator<Item = &'a f32>) -> Vec<u8> {
    values.flat_map(|v| v.to_le_bytes()).collect()
}

/// Serialize a scene to GLB bytes
pub fn export_glb(scene: &TextScene) -> Result<Vec<u8>> {
    let mut buffers = BufferBuilder::default();

    let primitive = mesh_primitive(&mut buffers, &scene.mesh);
    let material = material_json(&scene.mesh);

    let scale = scene.mesh.scale;
    let mut nodes = vec![json!({
        "name": scene.mesh.name,
        "mesh": 0,
        "scale": [scale, scale, scale],
    })];
    let mut lights = Vec::with_capacity(scene.lights.len());
    for (i, light) in scene.lights.iter().enumerate() {
        nodes.push(light_node(light, i));
        lights.push(json!({
            "name": light.name,
            "type": "directional",
            "color": light.color.to_linear(),
            "intensity": light.intensity,
        }));
    }
    tracing::trace!(
        intensity = scene.ambient.intensity,
        "ambient light has no glTF equivalent, not exported"
    );

    let root_nodes: Vec<usize> = (0..nodes.len()).collect();
    let mut doc = json!({
        "asset": { "version": "2.0", "generator": concat!("textmesh ", env!("CARGO_PKG_VERSION")) },
        "scene": 0,
        "scenes": [{ "nodes": root_nodes }],
        "nodes": nodes,
        "meshes": [{ "name": scene.mesh.name, "primitives": [primitive] }],
        "materials": [material],
    });

    if !lights.is_empty() {
        doc["extensionsUsed"] = json!([LIGHTS_EXTENSION]);
        doc["extensions"] = json!({ (LIGHTS_EXTENSION): { "lights": lights } });
    }

    if let Some(clip) = &scene.animation {
        doc["animations"] = json!([animation_json(&mut buffers, clip, 0)]);
    }

    doc["accessors"] = Value::Array(buffers.accessors);
    doc["bufferViews"] = Value::Array(buffers.views);
    let mut bin = buffers.bin;
    bin.resize((bin.len() + 3) & !3, 0);
    doc["buffers"] = json!([{ "byteLength": bin.len() }]);

    let json_str = serde_json::to_string(&doc)
        .map_err(|e| TextMeshError::Export(format!("Failed to serialize GLB JSON: {}", e)))?;

    let glb = pack_glb(json_str.as_bytes(), &bin)?;
    tracing::debug!(
        bytes = glb.len(),
        triangles = scene.mesh.geometry.triangle_count(),
        animated = scene.animation.is_some(),
        "exported GLB"
    );
    Ok(glb)
}

fn mesh_primitive(buffers: &mut BufferBuilder, mesh: &TextMesh) -> Value {
    let geometry = &mesh.geometry;
    if geometry.is_empty() {
        // A primitive needs at least one vertex; keep the node but draw nothing
        let position = buffers.vec3(&[[0.0, 0.0, 0.0]], true);
        return json!({
            "attributes": { "POSITION": position },
            "material": 0,
            "mode": MODE_POINTS,
        });
    }

    let position = buffers.vec3(&geometry.positions, true);
    let normal = buffers.vec3(&geometry.normals, false);
    let uv = buffers.vec2(&geometry.uvs);
    let indices = buffers.indices(&geometry.indices);
    json!({
        "attributes": { "POSITION": position, "NORMAL": normal, "TEXCOORD_0": uv },
        "indices": indices,
        "material": 0,
        "mode": MODE_TRIANGLES,
    })
}

fn material_json(mesh: &TextMesh) -> Value {
    let m = &mesh.material;
    let [r, g, b] = m.base_color.to_linear();
    let emissive = m.emissive.to_linear().map(|c| c * m.emissive_intensity);
    json!({
        "name": "TextMaterial",
        "pbrMetallicRoughness": {
            "baseColorFactor": [r, g, b, 1.0],
            "metallicFactor": m.metalness,
            "roughnessFactor": m.roughness,
        },
        "emissiveFactor": emissive,
    })
}

/// Directional lights shine down their node's local -Z
fn light_node(light: &DirectionalLight, index: usize) -> Value {
    let rotation = Quat::from_rotation_arc(Vec3::NEG_Z, light.direction());
    json!({
        "name": light.name,
        "translation": light.position.to_array(),
        "rotation": rotation.to_array(),
        "extensions": { (LIGHTS_EXTENSION): { "light": index } },
    })
}

fn animation_json(buffers: &mut BufferBuilder, clip: &AnimationClip, node: usize) -> Value {
    let times: Vec<f32> = clip.keyframes.iter().map(|k| k.time).collect();
    let rotations: Vec<[f32; 4]> = clip.keyframes.iter().map(|k| k.rotation).collect();
    let input = buffers.animation_input(&times);
    let output = buffers.animation_rotations(&rotations);
    json!({
        "name": clip.name,
        "samplers": [{
            "input": input,
            "output": output,
            "interpolation": clip.interpolation.as_gltf(),
        }],
        "channels": [{
            "sampler": 0,
            "target": { "node": node, "path": "rotation" },
        }],
    })
}

/// Pack a JSON document and binary buffer into a GLB container
fn pack_glb(json: &[u8], bin: &[u8]) -> Result<Vec<u8>> {
    let mut json_padded = json.to_vec();
    json_padded.resize((json.len() + 3) & !3, b' ');
    let mut bin_padded = bin.to_vec();
    bin_padded.resize((bin.len() + 3) & !3, 0);

    let total_len = 12 + 8 + json_padded.len() + 8 + bin_padded.len();
    let total_len = u32::try_from(total_len)
        .map_err(|_| TextMeshError::Export(format!("GLB too large: {} bytes", total_len)))?;

    let mut out = Vec::with_capacity(total_len as usize);
    out.extend_from_slice(GLB_MAGIC);
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&total_len.to_le_bytes());

    out.extend_from_slice(&(json_padded.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json_padded);

    out.extend_from_slice(&(bin_padded.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    out.extend_from_slice(&bin_padded);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::build_text_scene;
    use textmesh_core::GenerationRequest;
    use textmesh_font::Font;

    fn fixture_font() -> Font {
        Font::from_json_str(include_str!("../../textmesh-font/tests/fixtures/mini.typeface.json"))
            .unwrap()
    }

    fn export(text: &str, animate: bool) -> Vec<u8> {
        let mut request = GenerationRequest::new(text);
        request.animate = animate;
        let scene = build_text_scene(&fixture_font(), &request, 10.0).unwrap();
        export_glb(&scene).unwrap()
    }

    fn json_chunk(glb: &[u8]) -> Value {
        let len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        serde_json::from_slice(&glb[20..20 + len]).unwrap()
    }

    #[test]
    fn test_glb_header_and_alignment() {
        let glb = export("Hi", true);
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes(glb[4..8].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(glb[8..12].try_into().unwrap()) as usize, glb.len());
        assert_eq!(glb.len() % 4, 0);
        assert_eq!(u32::from_le_bytes(glb[16..20].try_into().unwrap()), CHUNK_JSON);

        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        assert_eq!(json_len % 4, 0);
        let bin_header = 20 + json_len;
        assert_eq!(
            u32::from_le_bytes(glb[bin_header + 4..bin_header + 8].try_into().unwrap()),
            CHUNK_BIN
        );
    }

    #[test]
    fn test_document_contents() {
        let doc = json_chunk(&export("Hi", true));
        assert_eq!(doc["meshes"].as_array().unwrap().len(), 1);
        assert_eq!(doc["nodes"][0]["name"], "AnimatedText");
        assert_eq!(doc["animations"][0]["name"], "rotate");
        assert_eq!(doc["animations"][0]["channels"][0]["target"]["path"], "rotation");
        assert_eq!(doc["extensionsUsed"][0], LIGHTS_EXTENSION);
        assert_eq!(doc["extensions"][LIGHTS_EXTENSION]["lights"].as_array().unwrap().len(), 2);

        let material = &doc["materials"][0]["pbrMetallicRoughness"];
        assert!((material["roughnessFactor"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert!((material["metallicFactor"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_no_animation_when_disabled() {
        let doc = json_chunk(&export("Hi", false));
        assert!(doc.get("animations").is_none());
    }

    #[test]
    fn test_gltf_crate_accepts_output() {
        let glb = export("HOi", true);
        let (document, buffers, _) = gltf::import_slice(&glb).unwrap();
        assert_eq!(document.meshes().count(), 1);
        assert_eq!(document.animations().count(), 1);

        let mesh = document.meshes().next().unwrap();
        let primitive = mesh.primitives().next().unwrap();
        let reader = primitive.reader(|b| Some(&buffers[b.index()]));
        let count = reader.read_indices().unwrap().into_u32().count();
        assert!(count > 0);
        assert_eq!(count % 3, 0);
    }

    #[test]
    fn test_empty_text_still_exports_one_mesh() {
        let glb = export(" ", true);
        let (document, _, _) = gltf::import_slice(&glb).unwrap();
        assert_eq!(document.meshes().count(), 1);
        let primitive = document.meshes().next().unwrap().primitives().next().unwrap();
        assert_eq!(primitive.mode(), gltf::mesh::Mode::Points);
    }

    #[test]
    fn test_light_rotation_aims_at_origin() {
        let scene = build_text_scene(&fixture_font(), &GenerationRequest::new("l"), 1.0).unwrap();
        let lights = scene.lights;
        let node = light_node(&lights[1], 1);
        let r: Vec<f32> = node["rotation"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap() as f32)
            .collect();
        let q = Quat::from_xyzw(r[0], r[1], r[2], r[3]);
        let shines = q * Vec3::NEG_Z;
        assert!((shines - lights[1].direction()).length() < 1e-5);
    }
}
