//! Aggregated views over storage items.

use serde::{Deserialize, Serialize};

use itemtree_core::traits::FileMetadata;

use super::model::StorageItem;

/// Counts over the direct live children of a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildrenCount {
    /// All direct live children.
    pub total: u64,
    /// Children that are files.
    pub files: u64,
    /// Children that are directories.
    pub folders: u64,
}

impl ChildrenCount {
    /// Build a count from the file and folder tallies.
    pub fn new(files: u64, folders: u64) -> Self {
        Self {
            total: files + folders,
            files,
            folders,
        }
    }
}

/// A storage item enriched for external consumers.
///
/// Files carry the metadata of the referenced file object when the
/// metadata collaborator knows it; directories carry their children count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    /// The item itself.
    #[serde(flatten)]
    pub item: StorageItem,
    /// Metadata of the referenced file (files only).
    pub file: Option<FileMetadata>,
    /// Direct live children (directories only).
    pub children: Option<ChildrenCount>,
}
