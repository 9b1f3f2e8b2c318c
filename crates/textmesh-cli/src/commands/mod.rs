//! CLI command implementations

pub mod generate;
pub mod inspect;
pub mod list;
pub mod serve;

use anyhow::{Context, Result};
use std::path::Path;
use textmesh_server::ServiceConfig;

/// Layered config, with `--config` taking the project file's place
pub(crate) fn load_config(path: Option<&str>) -> Result<ServiceConfig> {
    ServiceConfig::load(path.map(Path::new)).context("Failed to load configuration")
}
