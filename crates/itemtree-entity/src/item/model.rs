//! Storage item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use itemtree_core::types::{FileId, ItemId, StorageId};

/// A file or directory node in a per-storage tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StorageItem {
    /// Unique item identifier, assigned by the store.
    pub id: ItemId,
    /// The storage root this item belongs to.
    pub storage_id: StorageId,
    /// Display name, unique among live siblings.
    pub name: String,
    /// Whether the item is a directory. Never changes after creation.
    pub is_directory: bool,
    /// Parent directory (`None` at the storage root).
    pub parent_id: Option<ItemId>,
    /// Referenced file object; only set on files and shared between copies.
    pub file_id: Option<FileId>,
    /// The actor that created the item.
    pub creator_id: i64,
    /// Free-form tags with set semantics.
    pub tags: Vec<String>,
    /// When the item was moved to the trash (`None` while live).
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last written.
    pub updated_at: DateTime<Utc>,
}

impl StorageItem {
    /// Check whether the item is live (not in the trash).
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Check whether the item is in the trash.
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check whether the item sits at the storage root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check whether the item is a file.
    pub fn is_file(&self) -> bool {
        !self.is_directory
    }
}

/// Data required to create a new storage item. The store assigns the id
/// and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStorageItem {
    /// The owning storage.
    pub storage_id: StorageId,
    /// Item name.
    pub name: String,
    /// Directory or file.
    pub is_directory: bool,
    /// Parent directory (None for root).
    pub parent_id: Option<ItemId>,
    /// Referenced file object (files only).
    pub file_id: Option<FileId>,
    /// The creating actor.
    pub creator_id: i64,
    /// Initial tags.
    pub tags: Vec<String>,
}

impl CreateStorageItem {
    /// Build the persisted record for this request.
    ///
    /// Directories never carry a file reference and tags are normalized.
    pub fn into_item(self, id: ItemId, now: DateTime<Utc>) -> StorageItem {
        StorageItem {
            id,
            storage_id: self.storage_id,
            name: self.name,
            is_directory: self.is_directory,
            parent_id: self.parent_id,
            file_id: if self.is_directory { None } else { self.file_id },
            creator_id: self.creator_id,
            tags: normalize_tags(self.tags),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trim tags, drop empty ones and collapse duplicates. The result is
/// sorted so that equal tag sets compare equal.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(is_directory: bool) -> CreateStorageItem {
        CreateStorageItem {
            storage_id: StorageId::new(),
            name: "report.pdf".to_string(),
            is_directory,
            parent_id: None,
            file_id: Some(FileId::new()),
            creator_id: 7,
            tags: vec![" b ".into(), "a".into(), "b".into(), "".into()],
        }
    }

    #[test]
    fn test_into_item_keeps_file_reference_on_files() {
        let req = create(false);
        let file_id = req.file_id;
        let item = req.into_item(ItemId::new(), Utc::now());
        assert_eq!(item.file_id, file_id);
        assert!(item.is_live());
        assert!(item.is_root());
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_into_item_drops_file_reference_on_directories() {
        let item = create(true).into_item(ItemId::new(), Utc::now());
        assert!(item.file_id.is_none());
        assert!(!item.is_file());
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(
            normalize_tags(vec![" b ", "a", "b", "  "]),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
