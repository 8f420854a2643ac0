//! Items enriched for external consumers.

pub mod service;

pub use service::ItemDetailsService;
