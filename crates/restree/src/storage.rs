//! Storage layer for the resource tree.
//!
//! ## Module Structure
//!
//! - `index_types` - Compact id types (`ResourceId`, `OptionResourceId`)
//! - `resource` - Resource nodes, flags and directory payloads
//! - `arena` - Append-only arena addressed by `ResourceId`
//! - `order` - Sibling ordering (directories first, then by name)

mod arena;
mod index_types;
mod order;
mod resource;

pub use arena::{Arena, ArenaIter};
pub use index_types::{OptionResourceId, ResourceId};
pub use order::{compare_siblings, SiblingKey};
pub use resource::{Directory, Resource, ResourceFlags};
