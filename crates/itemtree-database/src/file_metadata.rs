//! In-memory registry implementing the file-metadata lookup capability.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use itemtree_core::result::AppResult;
use itemtree_core::traits::{FileMetadata, FileMetadataProvider};
use itemtree_core::types::FileId;

/// [`FileMetadataProvider`] holding records in a concurrent map.
///
/// Suitable for embedding the engine next to an upload component that
/// registers metadata as files arrive, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileMetadataProvider {
    records: Arc<DashMap<FileId, FileMetadata>>,
}

impl MemoryFileMetadataProvider {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the metadata of a file object.
    pub fn register(&self, metadata: FileMetadata) {
        self.records.insert(metadata.file_id, metadata);
    }

    /// Forget a file object. Returns the removed record, if any.
    pub fn unregister(&self, file_id: FileId) -> Option<FileMetadata> {
        self.records.remove(&file_id).map(|(_, record)| record)
    }
}

#[async_trait]
impl FileMetadataProvider for MemoryFileMetadataProvider {
    async fn find_by_id(&self, file_id: FileId) -> AppResult<Option<FileMetadata>> {
        Ok(self.records.get(&file_id).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn test_register_and_lookup() {
        let registry = MemoryFileMetadataProvider::new();
        let file_id = FileId::new();
        registry.register(FileMetadata {
            file_id,
            original_name: "report.pdf".into(),
            stored_name: format!("{file_id}.pdf"),
            size: 1024,
            mime_type: "application/pdf".into(),
            upload_time: Utc::now(),
            download_count: 0,
            creator_id: 3,
        });

        let found = registry.find_by_id(file_id).await.unwrap();
        assert_eq!(found.map(|m| m.size), Some(1024));
        assert!(registry.find_by_id(FileId::new()).await.unwrap().is_none());

        assert!(registry.unregister(file_id).is_some());
        assert!(registry.find_by_id(file_id).await.unwrap().is_none());
    }
}
