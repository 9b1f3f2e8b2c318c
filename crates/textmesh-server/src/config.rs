//! Layered service configuration
//!
//! Config is loaded with four layers of precedence (highest wins):
//! 1. Environment variables (`PORT`, `TEXTMESH_*`)
//! 2. An explicit `--config` file, or project-local `.textmesh/config.toml`
//! 3. Global: `~/.textmesh/config.toml`
//! 4. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use textmesh_core::{Result, TextMeshError, DEFAULT_MAX_TEXT_CHARS};
use textmesh_font::{DEFAULT_FONT_TIMEOUT_SECS, DEFAULT_FONT_URL};
use textmesh_publish::{LocalDiskPublisher, ObjectStorePublisher, ObjectStoreSettings, Publisher};

/// Where generated artifacts go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Local,
    ObjectStore,
}

impl FromStr for StorageBackend {
    type Err = TextMeshError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "object_store" | "object-store" => Ok(StorageBackend::ObjectStore),
            other => Err(TextMeshError::Config(format!(
                "Unknown storage backend '{}', expected 'local' or 'object_store'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base of artifact URIs; `http://localhost:<port>` when unset
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub max_text_chars: usize,
    pub animation_duration_secs: f32,
    /// Upper bound on one whole generation, font fetch included
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectStoreConfig {
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub public_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_dir: PathBuf,
    pub static_prefix: String,
    pub object_store: ObjectStoreConfig,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub font: FontConfig,
    pub generation: GenerationConfig,
    pub storage: StorageConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_url: None,
            },
            font: FontConfig {
                url: DEFAULT_FONT_URL.to_string(),
                timeout_secs: DEFAULT_FONT_TIMEOUT_SECS,
            },
            generation: GenerationConfig {
                max_text_chars: DEFAULT_MAX_TEXT_CHARS,
                animation_duration_secs: 10.0,
                timeout_secs: 60,
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                local_dir: PathBuf::from("temp"),
                static_prefix: "/temp".to_string(),
                object_store: ObjectStoreConfig {
                    timeout_secs: 60,
                    ..Default::default()
                },
            },
        }
    }
}

// On-disk layer: every field optional so a file only overrides what it names

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    server: ServerLayer,
    #[serde(default)]
    font: FontLayer,
    #[serde(default)]
    generation: GenerationLayer,
    #[serde(default)]
    storage: StorageLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerLayer {
    host: Option<String>,
    port: Option<u16>,
    public_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FontLayer {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerationLayer {
    max_text_chars: Option<usize>,
    animation_duration_secs: Option<f32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorageLayer {
    backend: Option<StorageBackend>,
    local_dir: Option<PathBuf>,
    static_prefix: Option<String>,
    #[serde(default)]
    object_store: ObjectStoreLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectStoreLayer {
    endpoint: Option<String>,
    bucket: Option<String>,
    api_key: Option<String>,
    public_url: Option<String>,
    timeout_secs: Option<u64>,
}

macro_rules! overlay {
    ($($target:expr => $value:expr),* $(,)?) => {
        $(if let Some(v) = $value {
            $target = v;
        })*
    };
}

impl ServiceConfig {
    /// Load config with layered precedence: defaults < global < project (or
    /// `explicit`) < env vars
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        // Layer 1: Global config (~/.textmesh/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.apply_file(Self::load_file(&global_path)?);
            }
        }

        // Layer 2: --config file, or project-local .textmesh/config.toml
        match explicit {
            Some(path) => config.apply_file(Self::load_file(path)?),
            None => {
                let local_path = PathBuf::from(".textmesh/config.toml");
                if local_path.exists() {
                    config.apply_file(Self::load_file(&local_path)?);
                }
            }
        }

        // Layer 3: Environment variable overrides
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with a single file, no env vars
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.apply_file(Self::load_file(path)?);
        config.validate()?;
        Ok(config)
    }

    /// Base URL used in artifact URIs
    pub fn public_url(&self) -> String {
        match &self.server.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.server.port),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn font_timeout(&self) -> Duration {
        Duration::from_secs(self.font.timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation.timeout_secs)
    }

    /// Build the publisher for the configured backend
    pub fn create_publisher(&self) -> Result<Arc<dyn Publisher>> {
        let storage = &self.storage;
        match storage.backend {
            StorageBackend::Local => Ok(Arc::new(LocalDiskPublisher::new(
                &storage.local_dir,
                &self.public_url(),
                &storage.static_prefix,
            ))),
            StorageBackend::ObjectStore => {
                let os = &storage.object_store;
                let (Some(endpoint), Some(bucket)) = (os.endpoint.clone(), os.bucket.clone()) else {
                    return Err(TextMeshError::Config(
                        "storage.object_store.endpoint and bucket are required for the object_store backend"
                            .to_string(),
                    ));
                };
                let publisher = ObjectStorePublisher::new(ObjectStoreSettings {
                    endpoint,
                    bucket,
                    api_key: os.api_key.clone(),
                    public_url: os.public_url.clone(),
                    timeout: Duration::from_secs(os.timeout_secs),
                })?;
                Ok(Arc::new(publisher))
            }
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".textmesh").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TextMeshError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            TextMeshError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn apply_file(&mut self, file: ConfigFile) {
        let ConfigFile {
            server,
            font,
            generation,
            storage,
        } = file;
        let os = storage.object_store;

        overlay! {
            self.server.host => server.host,
            self.server.port => server.port,
            self.font.url => font.url,
            self.font.timeout_secs => font.timeout_secs,
            self.generation.max_text_chars => generation.max_text_chars,
            self.generation.animation_duration_secs => generation.animation_duration_secs,
            self.generation.timeout_secs => generation.timeout_secs,
            self.storage.backend => storage.backend,
            self.storage.local_dir => storage.local_dir,
            self.storage.static_prefix => storage.static_prefix,
            self.storage.object_store.timeout_secs => os.timeout_secs,
        }
        if server.public_url.is_some() {
            self.server.public_url = server.public_url;
        }
        let target = &mut self.storage.object_store;
        if os.endpoint.is_some() {
            target.endpoint = os.endpoint;
        }
        if os.bucket.is_some() {
            target.bucket = os.bucket;
        }
        if os.api_key.is_some() {
            target.api_key = os.api_key;
        }
        if os.public_url.is_some() {
            target.public_url = os.public_url;
        }
    }

    /// Apply `PORT` and `TEXTMESH_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                TextMeshError::Config(format!("PORT must be a port number, got '{}'", port))
            })?;
        }
        if let Some(backend) = lookup("TEXTMESH_STORAGE") {
            self.storage.backend = backend.parse()?;
        }
        overlay! {
            self.server.host => lookup("TEXTMESH_HOST"),
            self.font.url => lookup("TEXTMESH_FONT_URL"),
            self.storage.local_dir => lookup("TEXTMESH_LOCAL_DIR").map(PathBuf::from),
        }
        let strings = [
            ("TEXTMESH_PUBLIC_URL", &mut self.server.public_url),
            ("TEXTMESH_OBJECT_STORE_ENDPOINT", &mut self.storage.object_store.endpoint),
            ("TEXTMESH_OBJECT_STORE_BUCKET", &mut self.storage.object_store.bucket),
            ("TEXTMESH_OBJECT_STORE_API_KEY", &mut self.storage.object_store.api_key),
            ("TEXTMESH_OBJECT_STORE_PUBLIC_URL", &mut self.storage.object_store.public_url),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key) {
                *slot = Some(value);
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.generation.max_text_chars == 0 {
            return Err(TextMeshError::Config(
                "generation.max_text_chars must be at least 1".to_string(),
            ));
        }
        let secs = self.generation.animation_duration_secs;
        if !(secs.is_finite() && secs > 0.0) {
            return Err(TextMeshError::Config(format!(
                "generation.animation_duration_secs must be positive, got {}",
                secs
            )));
        }
        let timeouts = [
            self.generation.timeout_secs,
            self.font.timeout_secs,
            self.storage.object_store.timeout_secs,
        ];
        if timeouts.contains(&0) {
            return Err(TextMeshError::Config("timeouts must be at least 1 second".to_string()));
        }
        Ok(())
    }
}
