//! Single-item reads and writes.

pub mod command;
pub mod query;

pub use command::{CommandService, CreateItemRequest};
pub use query::{QueryService, SearchRequest};
