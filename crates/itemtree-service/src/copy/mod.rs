//! Recursive deep copy.

pub mod naming;
pub mod service;

pub use service::CopyService;
