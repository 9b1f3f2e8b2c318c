//! Scene assembly for a text label

use crate::animation::AnimationClip;
use glam::Vec3;
use textmesh_core::{text_scale, Color, GenerationRequest, Result};
use textmesh_font::Font;
use textmesh_geometry::{build_text_geometry, MeshData, TextGeometryOptions};

/// Name of the single mesh node in every generated scene
pub const TEXT_MESH_NAME: &str = "AnimatedText";

/// Brand blue used for both base and emissive colour
const TEXT_COLOR: u32 = 0x4a90e2;

/// PBR material parameters, colours in sRGB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub base_color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
}

impl MaterialParams {
    /// The fixed material used for every label
    pub fn text() -> Self {
        Self {
            base_color: Color::from_hex(TEXT_COLOR),
            emissive: Color::from_hex(TEXT_COLOR),
            emissive_intensity: 0.2,
            roughness: 0.3,
            metalness: 0.4,
        }
    }
}

/// A directional light placed at `position` and aimed at the origin
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub name: String,
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector the light travels along
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or(Vec3::NEG_Z)
    }
}

/// Non-directional fill light. Has no glTF counterpart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// The extruded text and how it is shaded
#[derive(Debug, Clone)]
pub struct TextMesh {
    pub name: String,
    pub geometry: MeshData,
    pub material: MaterialParams,
    /// Uniform scale, a function of the text length only
    pub scale: f32,
}

/// Everything written into one GLB
#[derive(Debug, Clone)]
pub struct TextScene {
    pub mesh: TextMesh,
    pub ambient: AmbientLight,
    pub lights: Vec<DirectionalLight>,
    /// Targets `mesh` when present
    pub animation: Option<AnimationClip>,
}

impl TextScene {
    pub fn has_animation(&self) -> bool {
        self.animation.is_some()
    }
}

fn default_lights() -> (AmbientLight, Vec<DirectionalLight>) {
    let ambient = AmbientLight {
        color: Color::WHITE,
        intensity: 0.4,
    };
    let lights = vec![
        DirectionalLight {
            name: "KeyLight".to_string(),
            color: Color::WHITE,
            intensity: 0.6,
            position: Vec3::new(1.0, 1.0, 1.0),
        },
        DirectionalLight {
            name: "FillLight".to_string(),
            color: Color::WHITE,
            intensity: 0.3,
            position: Vec3::new(-1.0, 0.5, 0.5),
        },
    ];
    (ambient, lights)
}

/// Build the scene for a validated request.
///
/// The scene holds exactly one mesh; `animation_secs` is the length of the
/// turntable clip added when the request asks for animation.
pub fn build_text_scene(
    font: &Font,
    request: &GenerationRequest,
    animation_secs: f32,
) -> Result<TextScene> {
    let options = TextGeometryOptions::with_depth(request.depth);
    let geometry = build_text_geometry(font, &request.text, &options)?;
    if geometry.is_empty() {
        tracing::debug!(text = %request.text, "text produced no visible glyphs");
    }

    let (ambient, lights) = default_lights();
    let animation = request
        .animate
        .then(|| AnimationClip::turntable(animation_secs));

    Ok(TextScene {
        mesh: TextMesh {
            name: TEXT_MESH_NAME.to_string(),
            geometry,
            material: MaterialParams::text(),
            scale: text_scale(&request.text),
        },
        ambient,
        lights,
        animation,
    })
}
