//! Convenience result type alias for ItemTree.

use crate::error::AppError;

/// A specialized `Result` type for ItemTree operations.
pub type AppResult<T> = Result<T, AppError>;
