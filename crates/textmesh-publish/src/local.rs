//! Local directory publisher

use crate::publisher::{PublishedArtifact, Publisher};
use crate::slug::artifact_filename;
use std::fs;
use std::path::{Path, PathBuf};
use textmesh_core::{ContentHash, Result, TextMeshError};

/// Writes artifacts into a directory that the HTTP service serves under
/// `static_prefix`
pub struct LocalDiskPublisher {
    dir: PathBuf,
    public_base_url: String,
    static_prefix: String,
}

impl LocalDiskPublisher {
    pub fn new<P: AsRef<Path>>(dir: P, public_base_url: &str, static_prefix: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            static_prefix: normalize_prefix(static_prefix),
        }
    }

    /// Public URI for a file in the directory
    pub fn uri_for(&self, filename: &str) -> String {
        format!("{}{}/{}", self.public_base_url, self.static_prefix, filename)
    }
}

/// `temp`, `/temp/` and `/temp` all become `/temp`; an empty prefix stays empty
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Write `bytes` to `dir/filename` through a hidden temp file and a rename.
/// The temp file is removed if any step fails.
fn write_atomically(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let final_path = dir.join(filename);
    let temp_path = dir.join(format!(".{}.part", filename));

    let result = fs::write(&temp_path, bytes).and_then(|_| fs::rename(&temp_path, &final_path));
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(final_path)
}

fn is_glb(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("glb"))
}

impl Publisher for LocalDiskPublisher {
    fn name(&self) -> &str {
        "local"
    }

    fn publish(&self, bytes: &[u8], text: &str) -> Result<PublishedArtifact> {
        let filename = artifact_filename(text);
        let path = write_atomically(&self.dir, &filename, bytes).map_err(|e| {
            TextMeshError::Persistence(format!(
                "Failed to write {}: {}",
                self.dir.join(&filename).display(),
                e
            ))
        })?;

        let artifact = PublishedArtifact {
            uri: self.uri_for(&filename),
            filename,
            size_bytes: bytes.len() as u64,
            content_hash: ContentHash::from_bytes(bytes),
        };
        tracing::info!(
            path = %path.display(),
            bytes = artifact.size_bytes,
            hash = %artifact.content_hash.to_prefixed_hex(),
            "artifact written"
        );
        Ok(artifact)
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            TextMeshError::Persistence(format!("Failed to read {}: {}", self.dir.display(), e))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if is_glb(&path) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&self, filename: &str) -> Result<()> {
        let path = self.dir.join(filename);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "artifact removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TextMeshError::Persistence(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
