//! # itemtree-database
//!
//! The [`ItemStore`] persistence abstraction and its implementations:
//! a DashMap-backed in-memory store and a PostgreSQL store on sqlx. Also
//! hosts the connection pool wrapper, the migration runner and an
//! in-memory file-metadata registry.

pub mod connection;
pub mod file_metadata;
pub mod migration;
pub mod store;

pub use connection::DatabasePool;
pub use file_metadata::MemoryFileMetadataProvider;
pub use store::{ItemStore, MemoryItemStore, PgItemStore, connect_store};
