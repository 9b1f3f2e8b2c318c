//! Run the HTTP service

use anyhow::{Context, Result};

pub struct ServeArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub host: Option<String>,
}

pub fn run(args: ServeArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }

    // api_key is never serialized
    match serde_json::to_string(&config) {
        Ok(resolved) => tracing::debug!(config = %resolved, "resolved configuration"),
        Err(e) => tracing::warn!(error = %e, "could not render configuration"),
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(textmesh_server::serve(config))
        .context("Server failed")?;
    Ok(())
}
