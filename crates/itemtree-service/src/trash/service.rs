//! Soft-delete, restore and permanent deletion, cascading over subtrees.
//!
//! Every cascade first snapshots the descendant ids of the target and then
//! applies one bulk write to that set. The two steps are not atomic: an
//! item created under the subtree between the snapshot and the write is
//! not part of the cascade and stays in its previous state. Callers that
//! see a storage error mid-cascade can retry the whole call.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use itemtree_core::error::AppError;
use itemtree_core::types::{ItemId, StorageId};
use itemtree_database::ItemStore;
use itemtree_entity::item::{ItemFilter, StorageItem};

use crate::context::RequestContext;
use crate::tree::TreeService;

/// Where a restored item should land.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "parent_id")]
pub enum RestoreTarget {
    /// Back under its current parent, which must still be a live folder.
    #[default]
    Original,
    /// Under an explicit parent; `None` restores to the storage root.
    Parent(Option<ItemId>),
}

/// Manages the trash lifecycle of items and their subtrees.
#[derive(Debug, Clone)]
pub struct TrashService {
    /// Item store.
    store: Arc<dyn ItemStore>,
    /// Descendant collection.
    tree: TreeService,
}

impl TrashService {
    /// Creates a new trash service.
    pub fn new(store: Arc<dyn ItemStore>, tree: TreeService) -> Self {
        Self { store, tree }
    }

    /// Moves an item and every current descendant to the trash.
    ///
    /// Returns the number of items marked.
    pub async fn soft_delete(&self, ctx: &RequestContext, item_id: ItemId) -> Result<u64, AppError> {
        let item = self.find(item_id).await?;
        let ids = self.subtree_ids(item.id).await?;

        let marked = self.store.set_deleted_at(&ids, Some(Utc::now())).await?;

        info!(
            user_id = ctx.user_id,
            item_id = %item_id,
            storage_id = %item.storage_id,
            marked,
            "Item moved to trash"
        );

        Ok(marked)
    }

    /// Restores an item from the trash together with every current
    /// descendant.
    ///
    /// Descendants are restored regardless of when or how they were
    /// trashed, including ones trashed on their own before the item.
    pub async fn restore(
        &self,
        ctx: &RequestContext,
        item_id: ItemId,
        target: RestoreTarget,
    ) -> Result<StorageItem, AppError> {
        let mut item = self.find(item_id).await?;

        match target {
            RestoreTarget::Parent(Some(parent_id)) => {
                self.tree
                    .validate_target_parent(item.storage_id, parent_id)
                    .await?;
                if item.is_directory {
                    self.tree.ensure_outside_subtree(item.id, parent_id).await?;
                }
                item.parent_id = Some(parent_id);
            }
            RestoreTarget::Parent(None) => {
                item.parent_id = None;
            }
            RestoreTarget::Original => {
                if let Some(parent_id) = item.parent_id {
                    let usable = self
                        .store
                        .find_by_id(parent_id)
                        .await?
                        .is_some_and(|parent| parent.is_live());
                    if !usable {
                        return Err(AppError::invalid_argument(
                            "Original parent folder is missing or in the trash; \
                             choose a new parent to restore into",
                        ));
                    }
                }
            }
        }

        item.deleted_at = None;
        let item = self.store.update(&item).await?;

        let descendants = self.tree.get_children_ids_recursively(item.id).await?;
        let restored = self.store.set_deleted_at(&descendants, None).await?;

        info!(
            user_id = ctx.user_id,
            item_id = %item_id,
            parent_id = ?item.parent_id,
            descendants = restored,
            "Item restored from trash"
        );

        Ok(item)
    }

    /// Permanently removes an item and every current descendant.
    ///
    /// Referenced file objects are left alone; reclaiming their bytes is
    /// the file-metadata owner's job. Returns the number of records removed.
    pub async fn delete_permanent(
        &self,
        ctx: &RequestContext,
        item_id: ItemId,
    ) -> Result<u64, AppError> {
        let item = self.find(item_id).await?;
        let ids = self.subtree_ids(item.id).await?;

        let removed = self.store.delete_many(&ids).await?;

        info!(
            user_id = ctx.user_id,
            item_id = %item_id,
            storage_id = %item.storage_id,
            removed,
            "Item permanently deleted"
        );

        Ok(removed)
    }

    /// Permanently removes every trashed item of a storage along with each
    /// one's descendants. Returns the number of records removed.
    pub async fn empty_trash(
        &self,
        ctx: &RequestContext,
        storage_id: StorageId,
    ) -> Result<u64, AppError> {
        let trashed = self
            .store
            .find_ids(&ItemFilter::trashed().in_storage(storage_id))
            .await?;

        let mut doomed: HashSet<ItemId> = HashSet::with_capacity(trashed.len());
        for id in trashed {
            if doomed.contains(&id) {
                continue;
            }
            doomed.insert(id);
            doomed.extend(self.tree.get_children_ids_recursively(id).await?);
        }

        let ids: Vec<ItemId> = doomed.into_iter().collect();
        let removed = self.store.delete_many(&ids).await?;

        info!(
            user_id = ctx.user_id,
            storage_id = %storage_id,
            removed,
            "Trash emptied"
        );

        Ok(removed)
    }

    async fn find(&self, item_id: ItemId) -> Result<StorageItem, AppError> {
        self.store
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))
    }

    /// `item_id` followed by all of its descendants.
    async fn subtree_ids(&self, item_id: ItemId) -> Result<Vec<ItemId>, AppError> {
        let mut ids = vec![item_id];
        ids.extend(self.tree.get_children_ids_recursively(item_id).await?);
        debug!(item_id = %item_id, size = ids.len(), "Cascade snapshot taken");
        Ok(ids)
    }
}
