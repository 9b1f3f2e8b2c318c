//! textmesh server - HTTP service turning text into animated 3D labels
//!
//! Routes:
//! - `POST /generate-text` - build, export and publish a GLB, answer `{uri}`
//! - `GET /list-files` - published `.glb` names (local storage only)
//! - `GET /status` - liveness and process start time
//! - `GET /` - landing page
//! - `<static_prefix>/*` - the local artifact directory

pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;

pub use config::{ServiceConfig, StorageBackend};
pub use error::ApiError;
pub use pipeline::{generate_artifact, render_glb, Phase, PipelineError};

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use textmesh_core::{now_iso8601, Result};
use textmesh_font::{FontProvider, HttpFontProvider};
use textmesh_publish::Publisher;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub fonts: Arc<dyn FontProvider>,
    pub publisher: Arc<dyn Publisher>,
    /// Captured once when the state is built
    pub started_at: Arc<str>,
}

impl AppState {
    pub fn new(
        config: ServiceConfig,
        fonts: Arc<dyn FontProvider>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fonts,
            publisher,
            started_at: Arc::from(now_iso8601()),
        }
    }

    /// Wire up the HTTP font provider and the configured publisher
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let fonts = Arc::new(HttpFontProvider::new(
            config.font.url.clone(),
            config.font_timeout(),
        ));
        let publisher = config.create_publisher()?;
        Ok(Self::new(config, fonts, publisher))
    }
}

/// Build the router for `state`
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(routes::index))
        .route("/generate-text", post(routes::generate_text))
        .route("/list-files", get(routes::list_files))
        .route("/status", get(routes::status));

    let storage = &state.config.storage;
    if storage.backend == StorageBackend::Local {
        let files = ServeDir::new(&storage.local_dir);
        let prefix = storage.static_prefix.trim_end_matches('/');
        router = if prefix.is_empty() {
            router.fallback_service(files)
        } else if prefix.starts_with('/') {
            router.nest_service(prefix, files)
        } else {
            router.nest_service(&format!("/{}", prefix), files)
        };
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let addr = state.config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %addr,
        public_url = %state.config.public_url(),
        font = %state.fonts.describe(),
        storage = state.publisher.name(),
        started_at = %state.started_at,
        "textmesh server listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
