//! Limit/offset windows for paginated scans.

use serde::{Deserialize, Serialize};

/// Default number of items returned by a search.
pub const DEFAULT_LIMIT: u64 = 25;
/// Upper bound for a single page.
pub const MAX_LIMIT: u64 = 100;

/// A limit/offset window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of items to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u64,
}

impl Pagination {
    /// Create a window, clamping `limit` into `1..=MAX_LIMIT`.
    pub fn new(limit: u64, offset: u64) -> Self {
        Self::bounded(limit, offset, DEFAULT_LIMIT, MAX_LIMIT)
    }

    /// Create a window with caller-supplied defaults. A zero `limit`
    /// selects `default_limit`; anything above `max_limit` is clamped.
    pub fn bounded(limit: u64, offset: u64, default_limit: u64, max_limit: u64) -> Self {
        let max_limit = max_limit.max(1);
        let limit = if limit == 0 { default_limit } else { limit };
        Self {
            limit: limit.clamp(1, max_limit),
            offset,
        }
    }

    /// Apply the window to an already ordered iterator.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}
