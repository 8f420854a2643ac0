//! Item store trait and backend selection.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use itemtree_core::config::{DatabaseConfig, StoreProvider};
use itemtree_core::result::AppResult;
use itemtree_core::types::{ItemId, Pagination};
use itemtree_entity::item::{CreateStorageItem, ItemFilter, StorageItem};

use crate::connection::DatabasePool;
use crate::migration::run_migrations;

pub use memory::MemoryItemStore;
pub use postgres::PgItemStore;

/// Persistence abstraction over the storage item collection.
///
/// Single-document writes are atomic per item. Bulk writes apply to an
/// explicit id set in one call but are not transactional with any read
/// the caller made to build that set.
#[async_trait]
pub trait ItemStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an item by id, in any trash state.
    async fn find_by_id(&self, id: ItemId) -> AppResult<Option<StorageItem>>;

    /// Find items matching `filter`, ordered directories first, then by
    /// name and id. `window` limits the result when given.
    async fn find(
        &self,
        filter: &ItemFilter,
        window: Option<Pagination>,
    ) -> AppResult<Vec<StorageItem>>;

    /// Find the ids of every item matching `filter`.
    async fn find_ids(&self, filter: &ItemFilter) -> AppResult<Vec<ItemId>>;

    /// Count items matching `filter`.
    async fn count(&self, filter: &ItemFilter) -> AppResult<u64>;

    /// Insert a new item. The store assigns the id and timestamps.
    async fn create(&self, data: CreateStorageItem) -> AppResult<StorageItem>;

    /// Replace an existing item and return the stored version. Fails with
    /// `NotFound` when the id does not exist.
    async fn update(&self, item: &StorageItem) -> AppResult<StorageItem>;

    /// Set `deleted_at` on every item in `ids`. Returns the number of
    /// items written.
    async fn set_deleted_at(
        &self,
        ids: &[ItemId],
        deleted_at: Option<DateTime<Utc>>,
    ) -> AppResult<u64>;

    /// Remove every item in `ids`. Returns the number of items removed.
    async fn delete_many(&self, ids: &[ItemId]) -> AppResult<u64>;
}

/// Open the store selected by `config.provider`.
pub async fn connect_store(config: &DatabaseConfig) -> AppResult<Arc<dyn ItemStore>> {
    match config.provider {
        StoreProvider::Memory => {
            info!("Using in-memory item store");
            Ok(Arc::new(MemoryItemStore::new()))
        }
        StoreProvider::Postgres => {
            let pool = DatabasePool::connect(config).await?;
            if config.run_migrations {
                run_migrations(pool.pool()).await?;
            }
            Ok(Arc::new(PgItemStore::new(pool.into_pool())))
        }
    }
}
