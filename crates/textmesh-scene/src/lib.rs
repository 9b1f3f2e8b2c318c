//! textmesh scene - Label scenes, GLB export and inspection
//!
//! - `scene` assembles the text mesh, material, lights and optional clip
//! - `animation` holds the turntable rotation clip
//! - `export` writes a scene as a binary glTF
//! - `inspect` reads a GLB back with the `gltf` crate

pub mod animation;
pub mod export;
pub mod inspect;
pub mod scene;

pub use animation::{AnimationClip, Interpolation, Keyframe, DEFAULT_ROTATION_SECS, ROTATE_CLIP_NAME};
pub use export::export_glb;
pub use inspect::{inspect_glb, inspect_glb_file, AnimationSummary, GlbSummary, MeshNodeSummary};
pub use scene::{
    build_text_scene, AmbientLight, DirectionalLight, MaterialParams, TextMesh, TextScene,
    TEXT_MESH_NAME,
};
