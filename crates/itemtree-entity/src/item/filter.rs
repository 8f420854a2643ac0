//! Filters for scanning the item store.
//!
//! [`ItemFilter`] is the store-neutral query language: the in-memory store
//! evaluates it with [`ItemFilter::matches`], the PostgreSQL store
//! translates it into a `WHERE` clause. Unset fields match everything.

use serde::{Deserialize, Serialize};

use itemtree_core::types::{ItemId, StorageId};

use super::model::StorageItem;

/// Restriction on an item's `parent_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ParentFilter {
    /// Any parent, including the root.
    #[default]
    Any,
    /// Root-level items only (`parent_id` is null).
    Root,
    /// Direct children of one item.
    Is(ItemId),
    /// Direct children of any of the given items.
    AnyOf(Vec<ItemId>),
}

impl ParentFilter {
    /// Build a filter from an optional parent: `None` means the root level.
    pub fn from_parent(parent_id: Option<ItemId>) -> Self {
        match parent_id {
            Some(id) => Self::Is(id),
            None => Self::Root,
        }
    }
}

/// Restriction on an item's trash state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleFilter {
    /// `deleted_at` is null.
    #[default]
    Live,
    /// `deleted_at` is set.
    Trashed,
    /// Either state.
    All,
}

/// Restriction on an item's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum NameFilter {
    /// Exact, case-sensitive equality.
    Exact(String),
    /// Case-insensitive substring match.
    ContainsIgnoreCase(String),
}

/// A conjunction of restrictions over storage items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Owning storages (`None` = any storage).
    pub storage_ids: Option<Vec<StorageId>>,
    /// Parent restriction.
    pub parent: ParentFilter,
    /// Trash state restriction.
    pub lifecycle: LifecycleFilter,
    /// Name restriction.
    pub name: Option<NameFilter>,
    /// Items carrying at least one of these tags.
    pub tags_any: Option<Vec<String>>,
    /// Items created by this actor.
    pub creator_id: Option<i64>,
    /// Directories only (`true`) or files only (`false`).
    pub is_directory: Option<bool>,
    /// Items whose id is in this set.
    pub ids: Option<Vec<ItemId>>,
}

impl ItemFilter {
    /// A filter matching every live item.
    pub fn live() -> Self {
        Self::default()
    }

    /// A filter matching every trashed item.
    pub fn trashed() -> Self {
        Self {
            lifecycle: LifecycleFilter::Trashed,
            ..Self::default()
        }
    }

    /// A filter matching every item regardless of trash state.
    pub fn any_state() -> Self {
        Self {
            lifecycle: LifecycleFilter::All,
            ..Self::default()
        }
    }

    /// Restrict to one storage.
    pub fn in_storage(mut self, storage_id: StorageId) -> Self {
        self.storage_ids = Some(vec![storage_id]);
        self
    }

    /// Restrict to a set of storages.
    pub fn in_storages(mut self, storage_ids: Vec<StorageId>) -> Self {
        self.storage_ids = Some(storage_ids);
        self
    }

    /// Restrict the parent.
    pub fn with_parent(mut self, parent: ParentFilter) -> Self {
        self.parent = parent;
        self
    }

    /// Restrict the trash state.
    pub fn with_lifecycle(mut self, lifecycle: LifecycleFilter) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Restrict the name.
    pub fn with_name(mut self, name: NameFilter) -> Self {
        self.name = Some(name);
        self
    }

    /// Restrict to items carrying any of `tags`.
    pub fn with_any_tag(mut self, tags: Vec<String>) -> Self {
        self.tags_any = Some(tags);
        self
    }

    /// Restrict the creator.
    pub fn created_by(mut self, creator_id: i64) -> Self {
        self.creator_id = Some(creator_id);
        self
    }

    /// Restrict to directories or files.
    pub fn directories(mut self, is_directory: bool) -> Self {
        self.is_directory = Some(is_directory);
        self
    }

    /// Restrict to an explicit id set.
    pub fn with_ids(mut self, ids: Vec<ItemId>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Evaluate the filter against an item.
    pub fn matches(&self, item: &StorageItem) -> bool {
        if let Some(storage_ids) = &self.storage_ids {
            if !storage_ids.contains(&item.storage_id) {
                return false;
            }
        }

        let parent_ok = match &self.parent {
            ParentFilter::Any => true,
            ParentFilter::Root => item.parent_id.is_none(),
            ParentFilter::Is(id) => item.parent_id == Some(*id),
            ParentFilter::AnyOf(ids) => item.parent_id.is_some_and(|p| ids.contains(&p)),
        };
        if !parent_ok {
            return false;
        }

        let lifecycle_ok = match self.lifecycle {
            LifecycleFilter::Live => item.is_live(),
            LifecycleFilter::Trashed => item.is_trashed(),
            LifecycleFilter::All => true,
        };
        if !lifecycle_ok {
            return false;
        }

        match &self.name {
            Some(NameFilter::Exact(name)) if item.name != *name => return false,
            Some(NameFilter::ContainsIgnoreCase(needle))
                if !item.name.to_lowercase().contains(&needle.to_lowercase()) =>
            {
                return false;
            }
            _ => {}
        }

        if let Some(tags) = &self.tags_any {
            if !item.tags.iter().any(|t| tags.contains(t)) {
                return false;
            }
        }

        if self.creator_id.is_some_and(|c| c != item.creator_id) {
            return false;
        }

        if self.is_directory.is_some_and(|d| d != item.is_directory) {
            return false;
        }

        if let Some(ids) = &self.ids {
            if !ids.contains(&item.id) {
                return false;
            }
        }

        true
    }
}
