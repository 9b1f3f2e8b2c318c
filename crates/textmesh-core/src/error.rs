//! Error types for textmesh

use thiserror::Error;

/// The main error type for textmesh operations
#[derive(Debug, Error)]
pub enum TextMeshError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Font fetch error: {0}")]
    FontFetch(String),

    #[error("Font parse error: {0}")]
    FontParse(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Inspect error: {0}")]
    Inspect(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

/// Result type alias for textmesh operations
pub type Result<T> = std::result::Result<T, TextMeshError>;

impl TextMeshError {
    /// True for errors caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, TextMeshError::Validation(_))
    }
}

impl From<toml::de::Error> for TextMeshError {
    fn from(err: toml::de::Error) -> Self {
        TextMeshError::TomlParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_validation_is_client_error() {
        assert!(TextMeshError::Validation("bad".into()).is_client_error());
        assert!(!TextMeshError::FontFetch("down".into()).is_client_error());
        assert!(!TextMeshError::Persistence("disk".into()).is_client_error());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TextMeshError = io.into();
        assert!(err.to_string().contains("missing"));
    }
}
