//! Single-item mutations: create, rename, tag replacement.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use itemtree_core::error::AppError;
use itemtree_core::types::{FileId, ItemId, StorageId};
use itemtree_database::ItemStore;
use itemtree_entity::item::{
    CreateStorageItem, ItemFilter, NameFilter, ParentFilter, StorageItem, normalize_tags,
};

use crate::context::RequestContext;

/// Creates and edits individual storage items.
#[derive(Debug, Clone)]
pub struct CommandService {
    /// Item store.
    store: Arc<dyn ItemStore>,
}

/// Request to create a new item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemRequest {
    /// Storage the item belongs to.
    pub storage_id: StorageId,
    /// Parent directory (None for root-level).
    pub parent_id: Option<ItemId>,
    /// Item name.
    pub name: String,
    /// Directory or file.
    pub is_directory: bool,
    /// File object reference. Callers supply it for files; ignored for
    /// directories.
    #[serde(default)]
    pub file_id: Option<FileId>,
    /// Creating actor, defaults to the requesting user.
    #[serde(default)]
    pub creator_id: Option<i64>,
    /// Initial tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CommandService {
    /// Creates a new command service.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Creates a new item.
    ///
    /// The parent is not validated and sibling names are not checked for
    /// uniqueness here; callers that create items validate beforehand.
    pub async fn create_item(
        &self,
        ctx: &RequestContext,
        req: CreateItemRequest,
    ) -> Result<StorageItem, AppError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_argument("Item name cannot be empty"));
        }

        let item = self
            .store
            .create(CreateStorageItem {
                storage_id: req.storage_id,
                name: name.to_string(),
                is_directory: req.is_directory,
                parent_id: req.parent_id,
                file_id: req.file_id,
                creator_id: req.creator_id.unwrap_or(ctx.user_id),
                tags: req.tags,
            })
            .await?;

        info!(
            user_id = ctx.user_id,
            item_id = %item.id,
            storage_id = %item.storage_id,
            is_directory = item.is_directory,
            "Item created"
        );

        Ok(item)
    }

    /// Renames an item, rejecting names already used by a live sibling.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        item_id: ItemId,
        new_name: &str,
    ) -> Result<StorageItem, AppError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::invalid_argument("Item name cannot be empty"));
        }

        let mut item = self.find_live(item_id, "renaming").await?;

        let siblings = ItemFilter::live()
            .in_storage(item.storage_id)
            .with_parent(ParentFilter::from_parent(item.parent_id))
            .with_name(NameFilter::Exact(new_name.to_string()));
        let taken = self
            .store
            .find_ids(&siblings)
            .await?
            .into_iter()
            .any(|id| id != item_id);
        if taken {
            return Err(AppError::conflict(format!(
                "An item named '{new_name}' already exists here"
            )));
        }

        let old_name = std::mem::replace(&mut item.name, new_name.to_string());
        let item = self.store.update(&item).await?;

        info!(
            user_id = ctx.user_id,
            item_id = %item_id,
            old_name = %old_name,
            new_name = %item.name,
            "Item renamed"
        );

        Ok(item)
    }

    /// Replaces the tag set of an item.
    pub async fn update_tags(
        &self,
        ctx: &RequestContext,
        item_id: ItemId,
        tags: Vec<String>,
    ) -> Result<StorageItem, AppError> {
        let mut item = self.find_live(item_id, "tagging").await?;

        item.tags = normalize_tags(tags);
        let item = self.store.update(&item).await?;

        info!(
            user_id = ctx.user_id,
            item_id = %item_id,
            tags = item.tags.len(),
            "Item tags replaced"
        );

        Ok(item)
    }

    async fn find_live(&self, item_id: ItemId, action: &str) -> Result<StorageItem, AppError> {
        let item = self
            .store
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;

        if item.is_trashed() {
            return Err(AppError::invalid_state(format!(
                "Item is in the trash; restore it before {action}"
            )));
        }

        Ok(item)
    }
}
