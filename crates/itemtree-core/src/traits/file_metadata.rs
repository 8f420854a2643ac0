//! Read-only lookup into the external file-metadata collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::AppResult;
use crate::types::FileId;

/// Metadata about the file object a storage item points to.
///
/// The engine never writes these records; they are owned by whatever
/// component manages file bytes and uploads.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileMetadata {
    /// The file object this record describes.
    pub file_id: FileId,
    /// Name the file was uploaded with.
    pub original_name: String,
    /// Name under which the bytes are stored.
    pub stored_name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    pub mime_type: String,
    /// When the upload completed.
    pub upload_time: DateTime<Utc>,
    /// How many times the file has been downloaded.
    pub download_count: u64,
    /// The uploading actor.
    pub creator_id: i64,
}

/// Lookup-by-id capability over file metadata.
///
/// Returns `Ok(None)` when the collaborator does not know the id; errors
/// are reserved for the lookup itself failing.
#[async_trait]
pub trait FileMetadataProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Find metadata for a file object.
    async fn find_by_id(&self, file_id: FileId) -> AppResult<Option<FileMetadata>>;
}
