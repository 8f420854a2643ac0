//! Recursive deep copy of items and subtrees.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use itemtree_core::config::TreeConfig;
use itemtree_core::error::AppError;
use itemtree_core::types::{ItemId, StorageId};
use itemtree_database::ItemStore;
use itemtree_entity::item::{CreateStorageItem, ItemFilter, ParentFilter, StorageItem};

use super::naming::{first_free, nested_candidate, top_level_candidate};
use crate::context::RequestContext;
use crate::tree::TreeService;

/// Duplicates items and whole directory trees.
///
/// File content is shared, not duplicated: every copy of a file points at
/// the same `file_id`. A failed copy is not rolled back and a retried copy
/// creates another tree.
#[derive(Debug, Clone)]
pub struct CopyService {
    /// Item store.
    store: Arc<dyn ItemStore>,
    /// Target validation.
    tree: TreeService,
    /// Naming limits.
    config: TreeConfig,
}

impl CopyService {
    /// Creates a new copy service.
    pub fn new(store: Arc<dyn ItemStore>, tree: TreeService, config: TreeConfig) -> Self {
        Self {
            store,
            tree,
            config,
        }
    }

    /// Copies `item_id` under `target_parent_id` (`None` = storage root)
    /// and returns the new root.
    ///
    /// The root copy is named `"{name} (copy)"`, `"{name} (copy 2)"`, ...
    /// Live descendants keep their names unless the new folder already
    /// holds one, then get `"{name} (2)"`, `"{name} (3)"`, ... Trashed
    /// descendants are skipped.
    pub async fn copy_item(
        &self,
        ctx: &RequestContext,
        item_id: ItemId,
        target_parent_id: Option<ItemId>,
        storage_id: StorageId,
    ) -> Result<StorageItem, AppError> {
        let source = self
            .store
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;

        if source.is_trashed() {
            return Err(AppError::invalid_state(
                "Item is in the trash; restore it before copying",
            ));
        }
        if source.storage_id != storage_id {
            return Err(AppError::forbidden("Item belongs to a different storage"));
        }

        if let Some(target_id) = target_parent_id {
            self.tree
                .validate_target_parent(storage_id, target_id)
                .await?;
        }

        let taken = self.live_child_names(storage_id, target_parent_id).await?;
        let name = first_free(&taken, self.config.max_copy_suffix, |n| {
            top_level_candidate(&source.name, n)
        })
        .ok_or_else(|| {
            AppError::conflict(format!("No free copy name left for '{}'", source.name))
        })?;

        let root = self
            .store
            .create(duplicate(&source, name, target_parent_id))
            .await?;

        let mut copied = 1u64;
        if source.is_directory {
            copied += self.copy_children(&source, &root).await?;
        }

        info!(
            user_id = ctx.user_id,
            source_id = %item_id,
            copy_id = %root.id,
            target_parent = ?target_parent_id,
            copied,
            "Item copied"
        );

        Ok(root)
    }

    /// Copies the live subtree below `source` into `root`, one directory at
    /// a time. Returns the number of items created.
    async fn copy_children(
        &self,
        source: &StorageItem,
        root: &StorageItem,
    ) -> Result<u64, AppError> {
        // Items created by this copy are never used as sources, so copying
        // a folder into its own subtree cannot chase its own output.
        let mut created: HashSet<ItemId> = HashSet::from([root.id]);
        let mut pending = vec![(source.id, root.id)];
        let mut count = 0u64;

        while let Some((from_dir, into_dir)) = pending.pop() {
            let children = self
                .store
                .find(
                    &ItemFilter::live()
                        .in_storage(source.storage_id)
                        .with_parent(ParentFilter::Is(from_dir)),
                    None,
                )
                .await?;

            let mut taken = self
                .live_child_names(source.storage_id, Some(into_dir))
                .await?;

            for child in children {
                if created.contains(&child.id) {
                    continue;
                }

                let name = first_free(&taken, self.config.max_copy_suffix, |n| {
                    nested_candidate(&child.name, n)
                })
                .ok_or_else(|| {
                    AppError::conflict(format!("No free name left for '{}'", child.name))
                })?;

                let copy = self
                    .store
                    .create(duplicate(&child, name.clone(), Some(into_dir)))
                    .await?;
                debug!(source_id = %child.id, copy_id = %copy.id, name = %name, "Copied child");

                taken.insert(name);
                created.insert(copy.id);
                count += 1;

                if child.is_directory {
                    pending.push((child.id, copy.id));
                }
            }
        }

        Ok(count)
    }

    async fn live_child_names(
        &self,
        storage_id: StorageId,
        parent_id: Option<ItemId>,
    ) -> Result<HashSet<String>, AppError> {
        let siblings = self
            .store
            .find(
                &ItemFilter::live()
                    .in_storage(storage_id)
                    .with_parent(ParentFilter::from_parent(parent_id)),
                None,
            )
            .await?;
        Ok(siblings.into_iter().map(|s| s.name).collect())
    }
}

/// Creation data for a copy of `source` named `name` under `parent_id`.
fn duplicate(source: &StorageItem, name: String, parent_id: Option<ItemId>) -> CreateStorageItem {
    CreateStorageItem {
        storage_id: source.storage_id,
        name,
        is_directory: source.is_directory,
        parent_id,
        file_id: source.file_id,
        creator_id: source.creator_id,
        tags: source.tags.clone(),
    }
}
