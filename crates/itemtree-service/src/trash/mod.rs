//! Cascading trash lifecycle.

pub mod service;

pub use service::{RestoreTarget, TrashService};
