//! In-memory resource tree mirroring mounted filesystem subtrees.
//!
//! This crate keeps a live, path-indexed view of one or more directory trees:
//! - Arena storage for resources with parent back-references
//! - A path index that resolves any materialized path in O(1)
//! - Mounting that reads a whole subtree without holding the index lock
//! - Virtual ancestors that complete the parent chain of deep mounts
//!
//! Mounts may run concurrently; each mount's subtree becomes visible in the
//! index as one batch.

pub mod config;
pub mod error;
pub mod fs;
pub mod indexer;
pub mod storage;
pub mod tree;
pub mod types;

// Re-export main types
pub use config::TreeConfig;
pub use error::{normalize_path, Result, TreeError};
pub use fs::{DirEntryInfo, FileSystem, OsFileSystem};
pub use indexer::TreeData;
pub use storage::{compare_siblings, Resource, ResourceFlags, ResourceId, SiblingKey};
pub use tree::{Tree, TreeView};
pub use types::{ResourceInfo, TreeStats};
