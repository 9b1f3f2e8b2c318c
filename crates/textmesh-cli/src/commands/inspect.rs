//! Summarise a GLB file

use anyhow::{Context, Result};
use textmesh_scene::inspect_glb_file;

pub fn run(path: &str, format: &str) -> Result<()> {
    let summary =
        inspect_glb_file(path).with_context(|| format!("Failed to inspect '{}'", path))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", path);
    if let Some(generator) = &summary.generator {
        println!("  Generator:  {}", generator);
    }
    println!("  Meshes:     {}", summary.mesh_count);
    println!("  Vertices:   {}", summary.vertex_count);
    println!("  Triangles:  {}", summary.triangle_count);
    if let Some(bounds) = &summary.bounds {
        println!(
            "  Bounds:     [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
            bounds.min[0], bounds.min[1], bounds.min[2], bounds.max[0], bounds.max[1], bounds.max[2]
        );
    }
    for mesh in &summary.meshes {
        println!(
            "  Node:       {} (scale {:.3})",
            mesh.name.as_deref().unwrap_or("<unnamed>"),
            mesh.scale[0]
        );
    }
    if summary.animations.is_empty() {
        println!("  Animations: none");
    }
    for anim in &summary.animations {
        println!(
            "  Animation:  {} ({:.1}s, {} channel(s), {} keyframes)",
            anim.name.as_deref().unwrap_or("<unnamed>"),
            anim.duration,
            anim.channels,
            anim.keyframes
        );
    }
    if !summary.extensions_used.is_empty() {
        println!("  Extensions: {}", summary.extensions_used.join(", "));
    }

    Ok(())
}
