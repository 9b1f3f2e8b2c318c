//! textmesh geometry - Text outlines to triangle meshes
//!
//! Turns laid-out glyph outlines into a closed, beveled solid:
//! - `contour` flattens outline curves and sorts contours into solids and holes
//! - `extrude` fills the caps (lyon) and builds the bevel and side walls
//! - `mesh` holds the resulting flat-shaded triangle data
//! - `text` ties layout, extrusion and centering together

pub mod contour;
pub mod extrude;
pub mod mesh;
pub mod text;

pub use extrude::{extrude_outlines, ExtrudeOptions};
pub use mesh::MeshData;
pub use text::{build_text_geometry, TextGeometryOptions};
