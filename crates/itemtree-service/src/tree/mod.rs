//! Structural tree algorithms.

pub mod service;

pub use service::TreeService;
