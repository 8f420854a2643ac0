//! # itemtree-core
//!
//! Core crate for ItemTree. Contains the unified error system, typed
//! identifiers, pagination windows, configuration schemas, and the traits
//! for collaborators the engine consumes but does not own.
//!
//! This crate has **no** internal dependencies on other ItemTree crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
