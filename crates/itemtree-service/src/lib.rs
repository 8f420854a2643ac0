//! # itemtree-service
//!
//! The storage item tree engine. Each service owns one family of
//! operations and talks to persistence only through
//! [`ItemStore`](itemtree_database::ItemStore):
//!
//! - [`QueryService`]: read-only listings and search
//! - [`CommandService`]: create, rename, tag replacement
//! - [`TreeService`]: descendant collection, children counts, move
//! - [`TrashService`]: cascading soft-delete, restore, permanent delete
//! - [`CopyService`]: recursive deep copy with unique naming
//! - [`ItemDetailsService`]: items enriched with file metadata
//!
//! Callers are expected to have authorized the request before invoking
//! any service; the [`RequestContext`] only carries the acting user.

pub mod context;
pub mod copy;
pub mod details;
pub mod item;
pub mod trash;
pub mod tree;

pub use context::RequestContext;
pub use copy::CopyService;
pub use details::ItemDetailsService;
pub use item::{CommandService, CreateItemRequest, QueryService, SearchRequest};
pub use trash::{RestoreTarget, TrashService};
pub use tree::TreeService;
