//! In-memory item store backed by a concurrent hash map.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use itemtree_core::error::AppError;
use itemtree_core::result::AppResult;
use itemtree_core::types::{ItemId, Pagination};
use itemtree_entity::item::{CreateStorageItem, ItemFilter, StorageItem};

use super::ItemStore;

/// Process-local [`ItemStore`].
///
/// Each item lives in its own map entry, so single-item writes take the
/// entry's shard lock and cannot tear. Bulk writes visit entries one at a
/// time and are not atomic as a whole, matching a document store without
/// multi-document transactions.
#[derive(Debug, Clone, Default)]
pub struct MemoryItemStore {
    items: Arc<DashMap<ItemId, StorageItem>>,
}

impl MemoryItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, in any trash state.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert a record verbatim, bypassing id assignment. Lets callers
    /// seed fixtures or import existing trees.
    pub fn insert_raw(&self, item: StorageItem) {
        self.items.insert(item.id, item);
    }

    fn collect_matching(&self, filter: &ItemFilter) -> Vec<StorageItem> {
        let mut matched: Vec<StorageItem> = self
            .items
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matched.sort_by(listing_order);
        matched
    }
}

/// Directories first, then by name, then by id.
fn listing_order(a: &StorageItem, b: &StorageItem) -> Ordering {
    b.is_directory
        .cmp(&a.is_directory)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<StorageItem>> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find(
        &self,
        filter: &ItemFilter,
        window: Option<Pagination>,
    ) -> AppResult<Vec<StorageItem>> {
        let matched = self.collect_matching(filter);
        Ok(match window {
            Some(window) => window.apply(matched),
            None => matched,
        })
    }

    async fn find_ids(&self, filter: &ItemFilter) -> AppResult<Vec<ItemId>> {
        Ok(self
            .items
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| *entry.key())
            .collect())
    }

    async fn count(&self, filter: &ItemFilter) -> AppResult<u64> {
        Ok(self
            .items
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count() as u64)
    }

    async fn create(&self, data: CreateStorageItem) -> AppResult<StorageItem> {
        let item = data.into_item(ItemId::new(), Utc::now());
        self.items.insert(item.id, item.clone());
        debug!(item_id = %item.id, "Inserted item");
        Ok(item)
    }

    async fn update(&self, item: &StorageItem) -> AppResult<StorageItem> {
        let mut entry = self
            .items
            .get_mut(&item.id)
            .ok_or_else(|| AppError::not_found(format!("Item {} not found", item.id)))?;

        let mut stored = item.clone();
        stored.updated_at = Utc::now();
        *entry.value_mut() = stored.clone();
        Ok(stored)
    }

    async fn set_deleted_at(
        &self,
        ids: &[ItemId],
        deleted_at: Option<DateTime<Utc>>,
    ) -> AppResult<u64> {
        let now = Utc::now();
        let mut written = 0u64;
        for id in ids {
            if let Some(mut entry) = self.items.get_mut(id) {
                let item = entry.value_mut();
                item.deleted_at = deleted_at;
                item.updated_at = now;
                written += 1;
            }
        }
        debug!(requested = ids.len(), written, "Bulk set deleted_at");
        Ok(written)
    }

    async fn delete_many(&self, ids: &[ItemId]) -> AppResult<u64> {
        let removed = ids
            .iter()
            .filter(|id| self.items.remove(*id).is_some())
            .count() as u64;
        debug!(requested = ids.len(), removed, "Bulk delete");
        Ok(removed)
    }
}
