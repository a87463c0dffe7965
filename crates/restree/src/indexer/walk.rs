//! Recursive subtree read that builds a node tree.
//!
//! The read happens before anything becomes reachable from the index, so it
//! runs without locks. Children are sorted as they are collected, which lets
//! the graft phase append them in order.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::config::TreeConfig;
use crate::error::{Result, TreeError};
use crate::fs::FileSystem;
use crate::storage::{compare_siblings, SiblingKey};

/// A node of a freshly read subtree, not yet indexed.
#[derive(Debug)]
pub struct Node {
    /// The final path segment.
    pub name: OsString,
    /// Absolute path, cached for directories only.
    pub path: Option<PathBuf>,
    /// Child nodes in sibling order.
    pub children: Vec<Node>,
}

impl Node {
    pub fn directory(name: OsString, path: PathBuf) -> Self {
        Self {
            name,
            path: Some(path),
            children: Vec::new(),
        }
    }

    pub fn leaf(name: OsString) -> Self {
        Self {
            name,
            path: None,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.path.is_some()
    }
}

impl SiblingKey for Node {
    fn sibling_is_dir(&self) -> bool {
        self.is_dir()
    }

    fn sibling_name(&self) -> &OsStr {
        &self.name
    }
}

/// Shared state for one read.
pub struct WalkData<'a> {
    /// Number of files discovered.
    pub num_files: AtomicUsize,
    /// Number of directories discovered, including the mount root.
    pub num_dirs: AtomicUsize,
    /// Number of directories whose listing failed.
    pub errors: AtomicUsize,
    filesystem: &'a dyn FileSystem,
    config: &'a TreeConfig,
}

impl<'a> WalkData<'a> {
    pub fn new(filesystem: &'a dyn FileSystem, config: &'a TreeConfig) -> Self {
        Self {
            num_files: AtomicUsize::new(0),
            num_dirs: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            filesystem,
            config,
        }
    }
}

/// Reads the whole subtree rooted at the directory `path`.
///
/// A listing failure on `path` itself is returned as `ReadFailure`. Failures
/// below it are logged, counted, and leave that directory without children.
pub fn read_mount_root(path: &Path, walk_data: &WalkData) -> Result<Node> {
    let name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
    let mut root = Node::directory(name, path.to_path_buf());
    walk_data.num_dirs.fetch_add(1, Ordering::Relaxed);

    root.children = read_children(path, walk_data).map_err(|source| TreeError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(root)
}

fn read_children(dir_path: &Path, walk_data: &WalkData) -> io::Result<Vec<Node>> {
    let entries = walk_data.filesystem.read_dir(dir_path)?;

    let mut children: Vec<Node> = entries
        .into_iter()
        .filter_map(|entry| {
            let child_path = dir_path.join(&entry.name);
            if walk_data.config.is_ignored(&child_path) {
                return None;
            }
            if entry.is_dir {
                walk_data.num_dirs.fetch_add(1, Ordering::Relaxed);
                Some(Node::directory(entry.name, child_path))
            } else {
                walk_data.num_files.fetch_add(1, Ordering::Relaxed);
                Some(Node::leaf(entry.name))
            }
        })
        .collect();

    children.sort_unstable_by(compare_siblings);

    if walk_data.config.parallel_read {
        children
            .par_iter_mut()
            .filter(|child| child.is_dir())
            .for_each(|child| populate(child, walk_data));
    } else {
        children
            .iter_mut()
            .filter(|child| child.is_dir())
            .for_each(|child| populate(child, walk_data));
    }

    Ok(children)
}

/// Fills in a directory node's children, leaving them empty if the listing fails.
fn populate(node: &mut Node, walk_data: &WalkData) {
    let Some(path) = node.path.as_deref() else {
        return;
    };
    let children = match read_children(path, walk_data) {
        Ok(children) => children,
        Err(error) => {
            walk_data.errors.fetch_add(1, Ordering::Relaxed);
            log::warn!("unable to read directory {}: {}", path.display(), error);
            Vec::new()
        }
    };
    node.children = children;
}
