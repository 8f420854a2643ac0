//! Enriches items with file metadata and children counts.

use std::sync::Arc;

use tracing::debug;

use itemtree_core::error::AppError;
use itemtree_core::traits::FileMetadataProvider;
use itemtree_core::types::{ItemId, StorageId};
use itemtree_entity::item::{ItemDetails, StorageItem};

use crate::item::QueryService;
use crate::tree::TreeService;

/// Thin aggregator for external consumers.
///
/// Only reads from the file-metadata collaborator; an unknown `file_id`
/// yields details without metadata rather than an error.
#[derive(Debug, Clone)]
pub struct ItemDetailsService {
    /// Listings.
    query: QueryService,
    /// Children counts.
    tree: TreeService,
    /// File metadata lookup.
    files: Arc<dyn FileMetadataProvider>,
}

impl ItemDetailsService {
    /// Creates a new details service.
    pub fn new(
        query: QueryService,
        tree: TreeService,
        files: Arc<dyn FileMetadataProvider>,
    ) -> Self {
        Self { query, tree, files }
    }

    /// Gets one item with its metadata or children count.
    pub async fn get_item_details(&self, item_id: ItemId) -> Result<ItemDetails, AppError> {
        let item = self.query.get_item_by_id(item_id).await?;
        self.enrich(item).await
    }

    /// Lists a directory (or the storage root) with every entry enriched.
    pub async fn list_directory(
        &self,
        parent_id: Option<ItemId>,
        storage_id: Option<StorageId>,
    ) -> Result<Vec<ItemDetails>, AppError> {
        let items = self.query.get_items_by_parent(parent_id, storage_id).await?;
        let mut details = Vec::with_capacity(items.len());
        for item in items {
            details.push(self.enrich(item).await?);
        }
        Ok(details)
    }

    async fn enrich(&self, item: StorageItem) -> Result<ItemDetails, AppError> {
        if item.is_directory {
            let children = self.tree.get_children_count(item.id).await?;
            return Ok(ItemDetails {
                item,
                file: None,
                children: Some(children),
            });
        }

        let file = match item.file_id {
            Some(file_id) => {
                let metadata = self.files.find_by_id(file_id).await?;
                if metadata.is_none() {
                    debug!(item_id = %item.id, file_id = %file_id, "No metadata for file");
                }
                metadata
            }
            None => None,
        };

        Ok(ItemDetails {
            item,
            file,
            children: None,
        })
    }
}
