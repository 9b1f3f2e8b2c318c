//! textmesh publish - Getting generated GLBs to where clients can fetch them
//!
//! A `Publisher` is chosen once at startup:
//! - `LocalDiskPublisher` writes into a directory served by the HTTP service
//! - `ObjectStorePublisher` uploads to an HTTP object store bucket

mod local;
mod object_store;
mod publisher;
mod slug;

pub use local::LocalDiskPublisher;
pub use object_store::{ObjectStorePublisher, ObjectStoreSettings, GLB_CONTENT_TYPE};
pub use publisher::{PublishedArtifact, Publisher};
pub use slug::{artifact_filename, slugify, MAX_SLUG_CHARS};
