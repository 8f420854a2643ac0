//! Read-only item views: listings, trash and search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use itemtree_core::config::TreeConfig;
use itemtree_core::error::AppError;
use itemtree_core::types::{ItemId, Pagination, StorageId};
use itemtree_database::ItemStore;
use itemtree_entity::item::{
    ItemFilter, NameFilter, ParentFilter, StorageItem, normalize_tags,
};

/// Read-only queries over storage items.
#[derive(Debug, Clone)]
pub struct QueryService {
    /// Item store.
    store: Arc<dyn ItemStore>,
    /// Search page limits.
    config: TreeConfig,
}

/// Search request parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Storages to search. An empty list yields no results.
    pub storage_ids: Vec<StorageId>,
    /// Case-insensitive substring to look for in item names.
    #[serde(default)]
    pub query: Option<String>,
    /// Items carrying any of these tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Items created by this actor.
    #[serde(default)]
    pub creator_id: Option<i64>,
    /// Page size (`0` selects the configured default).
    #[serde(default)]
    pub limit: u64,
    /// Number of matches to skip.
    #[serde(default)]
    pub offset: u64,
}

impl QueryService {
    /// Creates a new query service.
    pub fn new(store: Arc<dyn ItemStore>, config: TreeConfig) -> Self {
        Self { store, config }
    }

    /// Gets an item by id, in any trash state.
    pub async fn get_item_by_id(&self, item_id: ItemId) -> Result<StorageItem, AppError> {
        self.store
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))
    }

    /// Lists the live children of `parent_id`, or the live root-level
    /// items when `parent_id` is `None`. `storage_id` scopes the listing,
    /// which matters for the root level.
    pub async fn get_items_by_parent(
        &self,
        parent_id: Option<ItemId>,
        storage_id: Option<StorageId>,
    ) -> Result<Vec<StorageItem>, AppError> {
        let mut filter = ItemFilter::live().with_parent(ParentFilter::from_parent(parent_id));
        if let Some(storage_id) = storage_id {
            filter = filter.in_storage(storage_id);
        }
        self.store.find(&filter, None).await
    }

    /// Lists every trashed item of a storage.
    pub async fn get_trash_items(&self, storage_id: StorageId) -> Result<Vec<StorageItem>, AppError> {
        let filter = ItemFilter::trashed().in_storage(storage_id);
        self.store.find(&filter, None).await
    }

    /// Searches live items by name, tags and creator with pagination.
    pub async fn search_items(&self, req: SearchRequest) -> Result<Vec<StorageItem>, AppError> {
        if req.storage_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut filter = ItemFilter::live().in_storages(req.storage_ids);

        if let Some(query) = req.query.as_deref().filter(|q| !q.is_empty()) {
            filter = filter.with_name(NameFilter::ContainsIgnoreCase(query.to_string()));
        }

        if let Some(tags) = req.tags.map(normalize_tags).filter(|t| !t.is_empty()) {
            filter = filter.with_any_tag(tags);
        }

        if let Some(creator_id) = req.creator_id {
            filter = filter.created_by(creator_id);
        }

        let window = Pagination::bounded(
            req.limit,
            req.offset,
            self.config.default_search_limit,
            self.config.max_search_limit,
        );

        self.store.find(&filter, Some(window)).await
    }
}
