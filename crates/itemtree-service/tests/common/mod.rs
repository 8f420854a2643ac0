//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use itemtree_core::config::TreeConfig;
use itemtree_core::types::{FileId, ItemId, StorageId};
use itemtree_database::{ItemStore, MemoryFileMetadataProvider, MemoryItemStore};
use itemtree_entity::item::StorageItem;
use itemtree_service::{
    CommandService, CopyService, CreateItemRequest, ItemDetailsService, QueryService,
    RequestContext, TrashService, TreeService,
};

/// Every service wired to one in-memory store.
pub struct TestTree {
    pub store: MemoryItemStore,
    pub files: MemoryFileMetadataProvider,
    pub command: CommandService,
    pub query: QueryService,
    pub tree: TreeService,
    pub trash: TrashService,
    pub copy: CopyService,
    pub details: ItemDetailsService,
    pub ctx: RequestContext,
    pub storage: StorageId,
}

impl TestTree {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        let store = MemoryItemStore::new();
        let files = MemoryFileMetadataProvider::new();
        let shared: Arc<dyn ItemStore> = Arc::new(store.clone());

        let tree = TreeService::new(shared.clone());
        let query = QueryService::new(shared.clone(), config.clone());
        let details = ItemDetailsService::new(query.clone(), tree.clone(), Arc::new(files.clone()));

        Self {
            command: CommandService::new(shared.clone()),
            trash: TrashService::new(shared.clone(), tree.clone()),
            copy: CopyService::new(shared, tree.clone(), config),
            query,
            tree,
            details,
            store,
            files,
            ctx: RequestContext::new(42),
            storage: StorageId::new(),
        }
    }

    pub async fn dir(&self, name: &str, parent_id: Option<ItemId>) -> StorageItem {
        self.dir_in(self.storage, name, parent_id).await
    }

    pub async fn dir_in(
        &self,
        storage_id: StorageId,
        name: &str,
        parent_id: Option<ItemId>,
    ) -> StorageItem {
        self.command
            .create_item(
                &self.ctx,
                CreateItemRequest {
                    storage_id,
                    parent_id,
                    name: name.to_string(),
                    is_directory: true,
                    file_id: None,
                    creator_id: None,
                    tags: Vec::new(),
                },
            )
            .await
            .expect("create directory")
    }

    pub async fn file(&self, name: &str, parent_id: Option<ItemId>) -> StorageItem {
        self.command
            .create_item(
                &self.ctx,
                CreateItemRequest {
                    storage_id: self.storage,
                    parent_id,
                    name: name.to_string(),
                    is_directory: false,
                    file_id: Some(FileId::new()),
                    creator_id: None,
                    tags: Vec::new(),
                },
            )
            .await
            .expect("create file")
    }

    pub async fn get(&self, id: ItemId) -> StorageItem {
        self.query.get_item_by_id(id).await.expect("item exists")
    }

    pub async fn names_under(&self, parent_id: Option<ItemId>) -> Vec<String> {
        self.query
            .get_items_by_parent(parent_id, Some(self.storage))
            .await
            .expect("listing")
            .into_iter()
            .map(|i| i.name)
            .collect()
    }
}
