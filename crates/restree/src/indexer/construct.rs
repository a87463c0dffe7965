//! Ancestor synthesis and grafting of read subtrees.
//!
//! Everything here runs under the tree's write lock, so the index moves from
//! one consistent state to the next once per mount.

use std::ffi::OsStr;
use std::path::Path;

use super::data::TreeData;
use super::walk::Node;
use crate::error::{Result, TreeError};
use crate::storage::{Resource, ResourceFlags, ResourceId};

/// Inserts a freshly read mount root and its subtree.
///
/// The mount root's parent chain is synthesized first. If the mount path is
/// already materialized its existing id is returned; a virtual resource in
/// its place is promoted and merged with the read.
pub(crate) fn graft_mount(data: &mut TreeData, root: Node) -> Result<ResourceId> {
    let Some(path) = root.path.clone() else {
        return Err(TreeError::NotADirectory(root.name.into()));
    };

    match path.parent() {
        Some(parent_path) => {
            let parent = ensure_ancestor(data, parent_path)?;
            Ok(graft(data, parent, parent_path, root, ResourceFlags::MOUNT_ROOT))
        }
        // Mounting `/` itself lands on the root sentinel.
        None => {
            let sentinel = data.root();
            Ok(graft(data, sentinel, &path, root, ResourceFlags::MOUNT_ROOT))
        }
    }
}

/// Returns the directory resource for `path`, creating virtual directories
/// for it and any missing ancestors.
///
/// Fails without creating anything if an indexed ancestor is not a directory.
pub(crate) fn ensure_ancestor(data: &mut TreeData, path: &Path) -> Result<ResourceId> {
    if let Some(id) = data.lookup(path) {
        return match data.get(id) {
            Some(resource) if resource.is_dir() => Ok(id),
            _ => Err(TreeError::NotADirectory(path.to_path_buf())),
        };
    }

    let parent = match path.parent() {
        Some(parent_path) => ensure_ancestor(data, parent_path)?,
        None => return Ok(data.root()),
    };

    let name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
    let id = data.insert(
        path.to_path_buf(),
        Resource::directory(name, parent, path.to_path_buf(), ResourceFlags::VIRTUAL),
    );
    data.attach_child(parent, id);
    log::debug!("synthesized virtual directory {}", path.display());
    Ok(id)
}

/// Inserts `node` below `parent`, whose path is `parent_path`.
fn graft(
    data: &mut TreeData,
    parent: ResourceId,
    parent_path: &Path,
    node: Node,
    flags: ResourceFlags,
) -> ResourceId {
    let path = match &node.path {
        Some(path) => path.clone(),
        None => parent_path.join(&node.name),
    };

    if let Some(existing) = data.lookup(&path) {
        merge_into(data, existing, node, flags);
        return existing;
    }

    let Node {
        name,
        path: directory_path,
        children,
    } = node;

    match directory_path {
        Some(directory_path) => {
            let id = data.insert(
                directory_path.clone(),
                Resource::directory(name, parent, directory_path.clone(), flags),
            );
            data.attach_child(parent, id);
            for child in children {
                graft(data, id, &directory_path, child, ResourceFlags::empty());
            }
            id
        }
        None => {
            let id = data.insert(path, Resource::leaf(name, parent));
            data.attach_child(parent, id);
            id
        }
    }
}

/// Merges a read directory into an already indexed resource.
///
/// Only virtual directories are touched: they lose `VIRTUAL`, gain `flags`,
/// and receive the read's entries. Materialized resources keep their state.
fn merge_into(data: &mut TreeData, existing: ResourceId, node: Node, flags: ResourceFlags) {
    let Some(resource) = data.get_mut(existing) else {
        return;
    };
    if !resource.is_virtual() || !resource.is_dir() {
        return;
    }
    let Node {
        path: Some(directory_path),
        children,
        ..
    } = node
    else {
        return;
    };

    resource.flags.remove(ResourceFlags::VIRTUAL);
    resource.flags.insert(flags);
    log::debug!("promoted virtual directory {}", directory_path.display());

    for child in children {
        graft(data, existing, &directory_path, child, ResourceFlags::empty());
    }
}
