//! Traits for collaborators the engine consumes but does not implement.

pub mod file_metadata;

pub use file_metadata::{FileMetadata, FileMetadataProvider};
