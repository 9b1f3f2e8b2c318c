//! List generated labels in the local artifact directory

use anyhow::{bail, Context, Result};
use textmesh_server::StorageBackend;

pub fn run(config_path: Option<&str>) -> Result<()> {
    let config = super::load_config(config_path)?;
    if config.storage.backend != StorageBackend::Local {
        bail!("Listing is only available for local storage");
    }

    let publisher = config.create_publisher()?;
    let names = publisher.list().with_context(|| {
        format!(
            "Failed to list '{}'",
            config.storage.local_dir.display()
        )
    })?;

    if names.is_empty() {
        println!("No labels in {}", config.storage.local_dir.display());
        return Ok(());
    }
    for name in &names {
        println!("{}", name);
    }
    println!("\n{} label(s)", names.len());
    Ok(())
}
