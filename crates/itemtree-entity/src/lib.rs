//! # itemtree-entity
//!
//! Domain entity models for ItemTree. [`item::StorageItem`] is the single
//! persisted record; the remaining types are value objects returned by
//! the services or used to query the item store.

pub mod item;

pub use item::{
    ChildrenCount, CreateStorageItem, ItemDetails, ItemFilter, LifecycleFilter, NameFilter,
    ParentFilter, StorageItem,
};
