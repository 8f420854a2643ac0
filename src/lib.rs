//! ItemTree: a hierarchical storage-item engine.
//!
//! Directories and files live in per-storage forests keyed by parent
//! reference. [`ItemTreeEngine`] wires an item store selected from
//! [`AppConfig`] to every service of the engine:
//!
//! ```no_run
//! # async fn demo() -> itemtree::AppResult<()> {
//! use itemtree::{AppConfig, ItemTreeEngine};
//!
//! let config = AppConfig::load("development")?;
//! itemtree::telemetry::init_logging(&config.logging)?;
//! let engine = ItemTreeEngine::connect(config).await?;
//! let roots = engine.query().get_items_by_parent(None, None).await?;
//! # let _ = roots;
//! # Ok(())
//! # }
//! ```

pub mod telemetry;

use std::sync::Arc;

use tracing::info;

pub use itemtree_core::config::AppConfig;
pub use itemtree_core::error::{AppError, ErrorKind};
pub use itemtree_core::result::AppResult;
pub use itemtree_core::traits::{FileMetadata, FileMetadataProvider};
pub use itemtree_core::types::{FileId, ItemId, StorageId};
pub use itemtree_entity::{ChildrenCount, ItemDetails, StorageItem};
pub use itemtree_service::{
    CommandService, CopyService, CreateItemRequest, ItemDetailsService, QueryService,
    RequestContext, RestoreTarget, SearchRequest, TrashService, TreeService,
};

use itemtree_database::{ItemStore, MemoryFileMetadataProvider, connect_store};

/// Every engine service sharing one item store.
#[derive(Debug, Clone)]
pub struct ItemTreeEngine {
    config: Arc<AppConfig>,
    store: Arc<dyn ItemStore>,
    query: QueryService,
    command: CommandService,
    tree: TreeService,
    trash: TrashService,
    copy: CopyService,
    details: ItemDetailsService,
}

impl ItemTreeEngine {
    /// Open the configured store and build the engine with an empty
    /// in-process file-metadata registry.
    pub async fn connect(config: AppConfig) -> AppResult<Self> {
        Self::connect_with_files(config, Arc::new(MemoryFileMetadataProvider::new())).await
    }

    /// Open the configured store and build the engine around an external
    /// file-metadata source.
    pub async fn connect_with_files(
        config: AppConfig,
        files: Arc<dyn FileMetadataProvider>,
    ) -> AppResult<Self> {
        let store = connect_store(&config.database).await?;
        info!(
            provider = ?config.database.provider,
            default_search_limit = config.tree.default_search_limit,
            max_search_limit = config.tree.max_search_limit,
            "Item tree engine ready"
        );
        Ok(Self::from_parts(config, store, files))
    }

    /// Build the engine over an already opened store.
    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn ItemStore>,
        files: Arc<dyn FileMetadataProvider>,
    ) -> Self {
        let tree = TreeService::new(Arc::clone(&store));
        let query = QueryService::new(Arc::clone(&store), config.tree.clone());
        let command = CommandService::new(Arc::clone(&store));
        let trash = TrashService::new(Arc::clone(&store), tree.clone());
        let copy = CopyService::new(Arc::clone(&store), tree.clone(), config.tree.clone());
        let details = ItemDetailsService::new(query.clone(), tree.clone(), files);

        Self {
            config: Arc::new(config),
            store,
            query,
            command,
            tree,
            trash,
            copy,
            details,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The underlying item store.
    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    pub fn query(&self) -> &QueryService {
        &self.query
    }

    pub fn command(&self) -> &CommandService {
        &self.command
    }

    pub fn tree(&self) -> &TreeService {
        &self.tree
    }

    pub fn trash(&self) -> &TrashService {
        &self.trash
    }

    pub fn copy(&self) -> &CopyService {
        &self.copy
    }

    pub fn details(&self) -> &ItemDetailsService {
        &self.details
    }
}
