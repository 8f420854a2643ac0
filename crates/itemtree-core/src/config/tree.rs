//! Tree engine tunables.

use serde::{Deserialize, Serialize};

use crate::types::pagination::{DEFAULT_LIMIT, MAX_LIMIT};

/// Limits applied by the query and copy services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Page size used by searches that pass `limit = 0`.
    #[serde(default = "default_search_limit")]
    pub default_search_limit: u64,
    /// Largest page a single search may return.
    #[serde(default = "default_max_search_limit")]
    pub max_search_limit: u64,
    /// Highest counter tried when generating a unique copy name before
    /// giving up with a conflict.
    #[serde(default = "default_max_copy_suffix")]
    pub max_copy_suffix: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            default_search_limit: default_search_limit(),
            max_search_limit: default_max_search_limit(),
            max_copy_suffix: default_max_copy_suffix(),
        }
    }
}

fn default_search_limit() -> u64 {
    DEFAULT_LIMIT
}

fn default_max_search_limit() -> u64 {
    MAX_LIMIT
}

fn default_max_copy_suffix() -> u32 {
    10_000
}
