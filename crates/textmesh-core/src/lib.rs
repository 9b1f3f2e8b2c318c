//! textmesh core - Foundational types for the textmesh workspace
//!
//! This crate provides the types that all other textmesh crates depend on:
//! - `GenerationRequest` - Validated input for one text-to-GLB generation
//! - `Color`, `MeshBounds` - Visual and spatial types
//! - `ContentHash` - SHA-256 based artifact hashing
//! - Error types and Result alias

mod error;
mod hash;
mod request;
mod time;
mod types;

pub use error::{Result, TextMeshError};
pub use hash::ContentHash;
pub use request::{text_scale, GenerationRequest, DEFAULT_DEPTH, DEFAULT_MAX_TEXT_CHARS};
pub use time::now_iso8601;
pub use types::{Color, MeshBounds};
