//! Descendant collection, children counts and moves.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use itemtree_core::error::AppError;
use itemtree_core::types::{ItemId, StorageId};
use itemtree_database::ItemStore;
use itemtree_entity::item::{ChildrenCount, ItemFilter, ParentFilter, StorageItem};

use crate::context::RequestContext;

/// Structural operations over the parent graph.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Item store.
    store: Arc<dyn ItemStore>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Collects the id of every item transitively below `parent_id`.
    ///
    /// Walks level by level with one store query per level and does not
    /// look at trash state, so trashed subtrees are included. The returned
    /// set never contains `parent_id` itself. A visited set stops the walk
    /// if the parent graph ever contains a cycle.
    pub async fn get_children_ids_recursively(
        &self,
        parent_id: ItemId,
    ) -> Result<Vec<ItemId>, AppError> {
        let mut visited: HashSet<ItemId> = HashSet::from([parent_id]);
        let mut collected = Vec::new();
        let mut frontier = vec![parent_id];
        let mut depth = 0usize;

        while !frontier.is_empty() {
            let filter = ItemFilter::any_state().with_parent(ParentFilter::AnyOf(frontier));
            let children = self.store.find_ids(&filter).await?;

            let mut next = Vec::with_capacity(children.len());
            for child in children {
                if visited.insert(child) {
                    collected.push(child);
                    next.push(child);
                } else {
                    warn!(
                        root = %parent_id,
                        item_id = %child,
                        "Parent graph revisits an item; skipping to break the cycle"
                    );
                }
            }

            frontier = next;
            depth += 1;
        }

        debug!(
            root = %parent_id,
            descendants = collected.len(),
            levels = depth.saturating_sub(1),
            "Collected descendants"
        );
        Ok(collected)
    }

    /// Counts the direct live children of `item_id`.
    pub async fn get_children_count(&self, item_id: ItemId) -> Result<ChildrenCount, AppError> {
        let children = ItemFilter::live().with_parent(ParentFilter::Is(item_id));
        let folders = self.store.count(&children.clone().directories(true)).await?;
        let files = self.store.count(&children.directories(false)).await?;
        Ok(ChildrenCount::new(files, folders))
    }

    /// Moves an item under a new parent (`None` = storage root).
    ///
    /// Moving to the current parent returns the item untouched without a
    /// write. Directories are checked against being moved into their own
    /// subtree by walking the target's ancestor chain.
    pub async fn move_item(
        &self,
        ctx: &RequestContext,
        item_id: ItemId,
        new_parent_id: Option<ItemId>,
    ) -> Result<StorageItem, AppError> {
        let mut item = self
            .store
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;

        if item.is_trashed() {
            return Err(AppError::invalid_state(
                "Item is in the trash; restore it before moving",
            ));
        }

        if item.parent_id == new_parent_id {
            debug!(item_id = %item_id, "Move target equals current parent; nothing to do");
            return Ok(item);
        }

        if item.is_directory && new_parent_id == Some(item_id) {
            return Err(AppError::invalid_argument("Cannot move a folder into itself"));
        }

        if let Some(target_id) = new_parent_id {
            self.validate_target_parent(item.storage_id, target_id)
                .await?;
            if item.is_directory {
                self.ensure_outside_subtree(item_id, target_id).await?;
            }
        }

        let old_parent = item.parent_id;
        item.parent_id = new_parent_id;
        let item = self.store.update(&item).await?;

        info!(
            user_id = ctx.user_id,
            item_id = %item_id,
            from = ?old_parent,
            to = ?new_parent_id,
            "Item moved"
        );

        Ok(item)
    }

    /// Checks that `target_id` can receive children from `storage_id`:
    /// it must exist, be a directory, be live and share the storage.
    pub async fn validate_target_parent(
        &self,
        storage_id: StorageId,
        target_id: ItemId,
    ) -> Result<StorageItem, AppError> {
        let target = self
            .store
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::not_found("Target folder not found"))?;

        if !target.is_directory {
            return Err(AppError::invalid_argument("Target is not a folder"));
        }
        if target.is_trashed() {
            return Err(AppError::invalid_state("Target folder is in the trash"));
        }
        if target.storage_id != storage_id {
            return Err(AppError::forbidden(
                "Target folder belongs to a different storage",
            ));
        }

        Ok(target)
    }

    /// Fails when `target_id` is `item_id` or one of its descendants.
    ///
    /// Reads the ancestor chain fresh from the store. A missing ancestor
    /// record is treated as reaching the root.
    pub async fn ensure_outside_subtree(
        &self,
        item_id: ItemId,
        target_id: ItemId,
    ) -> Result<(), AppError> {
        let mut visited = HashSet::new();
        let mut current = Some(target_id);

        while let Some(ancestor_id) = current {
            if ancestor_id == item_id {
                return Err(AppError::invalid_argument(
                    "Cannot move a folder into its own subtree",
                ));
            }
            if !visited.insert(ancestor_id) {
                warn!(
                    item_id = %item_id,
                    ancestor = %ancestor_id,
                    "Ancestor chain loops; treating as root"
                );
                break;
            }
            current = match self.store.find_by_id(ancestor_id).await? {
                Some(ancestor) => ancestor.parent_id,
                None => {
                    debug!(ancestor = %ancestor_id, "Ancestor missing; treating as root");
                    None
                }
            };
        }

        Ok(())
    }
}
