//! Storage item entities.

pub mod details;
pub mod filter;
pub mod model;

pub use details::{ChildrenCount, ItemDetails};
pub use filter::{ItemFilter, LifecycleFilter, NameFilter, ParentFilter};
pub use model::{CreateStorageItem, StorageItem, normalize_tags};
