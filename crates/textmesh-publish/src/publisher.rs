//! Publisher trait

use textmesh_core::{ContentHash, Result};

/// A GLB that has been made available to clients
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedArtifact {
    pub filename: String,
    /// Where clients fetch the artifact
    pub uri: String,
    pub size_bytes: u64,
    pub content_hash: ContentHash,
}

/// Makes generated GLB bytes retrievable by URI
pub trait Publisher: Send + Sync {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    /// Store `bytes` under a fresh filename derived from `text`.
    ///
    /// Either the whole artifact becomes retrievable or nothing does.
    fn publish(&self, bytes: &[u8], text: &str) -> Result<PublishedArtifact>;

    /// Names of published `.glb` artifacts, sorted
    fn list(&self) -> Result<Vec<String>>;

    /// Withdraw a published artifact. Removing one that is already gone succeeds.
    fn remove(&self, filename: &str) -> Result<()>;
}
