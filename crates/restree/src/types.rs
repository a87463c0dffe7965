//! Owned snapshots handed to consumers of the tree.
//!
//! These outlive the read lock, so report and UI layers can hold or
//! serialize them freely.

use std::path::PathBuf;

use serde::Serialize;

use crate::storage::ResourceId;

/// A copy of one resource's identity, flags and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInfo {
    pub id: ResourceId,
    /// Final path segment (lossily converted); empty for the root sentinel.
    pub name: String,
    pub path: PathBuf,
    pub parent: Option<ResourceId>,
    pub is_dir: bool,
    pub is_virtual: bool,
    pub is_mount_root: bool,
    /// Children in sibling order.
    pub children: Vec<ResourceId>,
}

/// Tree size and read counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Indexed resources, the root sentinel included.
    pub resources: usize,
    pub directories: usize,
    pub files: usize,
    /// Directories still flagged virtual, the root sentinel included.
    pub virtual_directories: usize,
    pub mount_roots: usize,
    /// Full subtree reads performed by mounts.
    pub reads: usize,
    /// Directory listings that failed below a mount root.
    pub read_errors: usize,
}
