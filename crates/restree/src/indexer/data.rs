//! Arena plus path index.
//!
//! `TreeData` holds every resource ever materialized and the map from absolute
//! path to resource id. The map is the single source of truth for whether a
//! path has been materialized.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use fnv::FnvHashMap;

use crate::storage::{compare_siblings, Arena, ArenaIter, Resource, ResourceId};
use crate::types::{ResourceInfo, TreeStats};

/// Path of the root sentinel.
pub const ROOT_PATH: &str = "/";

#[derive(Debug)]
pub struct TreeData {
    arena: Arena,
    index: FnvHashMap<PathBuf, ResourceId>,
}

impl Default for TreeData {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl TreeData {
    /// Creates tree data holding only the root sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = Arena::with_capacity(capacity);
        let mut index = FnvHashMap::with_capacity_and_hasher(capacity, Default::default());
        let root = arena.insert(Resource::root(PathBuf::from(ROOT_PATH)));
        index.insert(PathBuf::from(ROOT_PATH), root);
        Self { arena, index }
    }

    #[inline]
    pub fn root(&self) -> ResourceId {
        ResourceId::ROOT
    }

    #[inline]
    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.arena.get(id)
    }

    /// Resolves an absolute, normalized path.
    #[inline]
    pub fn lookup(&self, path: &Path) -> Option<ResourceId> {
        self.index.get(path).copied()
    }

    /// Computes the absolute path of a resource.
    ///
    /// Directories answer from their cached path; other resources append
    /// their name to the parent's path.
    pub fn path(&self, id: ResourceId) -> Option<PathBuf> {
        let resource = self.arena.get(id)?;
        if let Some(path) = resource.cached_path() {
            return Some(path.to_path_buf());
        }
        let parent = resource.parent()?;
        Some(self.path(parent)?.join(resource.name()))
    }

    /// Children of a resource in sibling order; empty for unknown ids and
    /// non-directories.
    pub fn children(&self, id: ResourceId) -> &[ResourceId] {
        self.arena.get(id).map(Resource::children).unwrap_or_default()
    }

    /// Number of indexed resources, the root sentinel included.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false: the root sentinel is indexed from the start.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over `(path, id)` index entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, ResourceId)> {
        self.index.iter().map(|(path, id)| (path.as_path(), *id))
    }

    /// Iterates over resources in creation order.
    pub fn resources(&self) -> ArenaIter<'_> {
        self.arena.iter()
    }

    /// Builds an owned snapshot of one resource.
    pub fn info(&self, id: ResourceId) -> Option<ResourceInfo> {
        let resource = self.arena.get(id)?;
        Some(ResourceInfo {
            id,
            name: resource.name().to_string_lossy().into_owned(),
            path: self.path(id)?,
            parent: resource.parent(),
            is_dir: resource.is_dir(),
            is_virtual: resource.is_virtual(),
            is_mount_root: resource.is_mount_root(),
            children: resource.children().to_vec(),
        })
    }

    /// Counts resources by kind. Read counters are left at zero.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            resources: self.len(),
            ..TreeStats::default()
        };
        for (_, resource) in self.resources() {
            if resource.is_dir() {
                stats.directories += 1;
            } else {
                stats.files += 1;
            }
            if resource.is_virtual() {
                stats.virtual_directories += 1;
            }
            if resource.is_mount_root() {
                stats.mount_roots += 1;
            }
        }
        stats
    }

    // -------------------------------------------------------------------------
    // Mutation (graft phase only)
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.arena.get_mut(id)
    }

    /// Stores a resource and indexes it under `path`.
    pub(crate) fn insert(&mut self, path: PathBuf, resource: Resource) -> ResourceId {
        let id = self.arena.insert(resource);
        self.index.insert(path, id);
        id
    }

    /// Links `child` into `parent`'s child list at its sibling position.
    pub(crate) fn attach_child(&mut self, parent: ResourceId, child: ResourceId) {
        let position = {
            let child_resource = &self.arena[child];
            self.arena[parent].children().partition_point(|&sibling| {
                compare_siblings(&self.arena[sibling], child_resource) == Ordering::Less
            })
        };

        match self
            .arena
            .get_mut(parent)
            .and_then(Resource::directory_payload_mut)
        {
            Some(directory) => directory.children.insert(position, child),
            None => {
                debug_assert!(false, "parent resource has no directory payload");
                log::error!("cannot attach child to non-directory resource {parent:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ResourceFlags;

    fn add_dir(data: &mut TreeData, parent: ResourceId, path: &str) -> ResourceId {
        let path = PathBuf::from(path);
        let name = path.file_name().unwrap().to_os_string();
        let id = data.insert(
            path.clone(),
            Resource::directory(name, parent, path, ResourceFlags::empty()),
        );
        data.attach_child(parent, id);
        id
    }

    fn add_file(data: &mut TreeData, parent: ResourceId, path: &str) -> ResourceId {
        let path = PathBuf::from(path);
        let name = path.file_name().unwrap().to_os_string();
        let id = data.insert(path, Resource::leaf(name, parent));
        data.attach_child(parent, id);
        id
    }

    #[test]
    fn starts_with_root_sentinel() {
        let data = TreeData::default();
        assert_eq!(data.len(), 1);
        assert!(!data.is_empty());
        assert_eq!(data.lookup(Path::new("/")), Some(ResourceId::ROOT));
        assert_eq!(data.path(ResourceId::ROOT), Some(PathBuf::from("/")));
        assert!(data.children(ResourceId::ROOT).is_empty());
    }

    #[test]
    fn leaf_paths_come_from_parent() {
        let mut data = TreeData::default();
        let src = add_dir(&mut data, ResourceId::ROOT, "/src");
        let main = add_file(&mut data, src, "/src/main.rs");

        assert_eq!(data.path(main), Some(PathBuf::from("/src/main.rs")));
        assert_eq!(data.lookup(Path::new("/src/main.rs")), Some(main));
        assert_eq!(data.children(main), &[] as &[ResourceId]);
        assert_eq!(data.path(ResourceId::new(99)), None);
    }

    #[test]
    fn attach_keeps_sibling_order() {
        let mut data = TreeData::default();
        let top = add_dir(&mut data, ResourceId::ROOT, "/top");
        let z = add_file(&mut data, top, "/top/z.go");
        let b = add_file(&mut data, top, "/top/b");
        let dir2 = add_dir(&mut data, top, "/top/dir2");
        let a = add_file(&mut data, top, "/top/A");
        let dir1 = add_dir(&mut data, top, "/top/dir1");

        assert_eq!(data.children(top), &[dir1, dir2, a, b, z]);
    }

    #[test]
    fn every_indexed_path_round_trips() {
        let mut data = TreeData::default();
        let a = add_dir(&mut data, ResourceId::ROOT, "/a");
        let b = add_dir(&mut data, a, "/a/b");
        add_file(&mut data, b, "/a/b/c.txt");
        add_file(&mut data, a, "/a/d.txt");

        assert_eq!(data.len(), 5);
        for (path, id) in data.iter() {
            assert_eq!(data.path(id).as_deref(), Some(path));
        }
    }

    #[test]
    fn stats_count_kinds() {
        let mut data = TreeData::default();
        let a = add_dir(&mut data, ResourceId::ROOT, "/a");
        add_file(&mut data, a, "/a/x");
        add_file(&mut data, a, "/a/y");

        let stats = data.stats();
        assert_eq!(stats.resources, 4);
        assert_eq!(stats.directories, 2);
        assert_eq!(stats.files, 2);
        assert_eq!(stats.virtual_directories, 1);
        assert_eq!(stats.mount_roots, 0);
    }

    #[test]
    fn info_snapshot() {
        let mut data = TreeData::default();
        let a = add_dir(&mut data, ResourceId::ROOT, "/a");
        let x = add_file(&mut data, a, "/a/x");

        let info = data.info(a).unwrap();
        assert_eq!(info.name, "a");
        assert_eq!(info.path, PathBuf::from("/a"));
        assert_eq!(info.parent, Some(ResourceId::ROOT));
        assert!(info.is_dir);
        assert!(!info.is_virtual);
        assert_eq!(info.children, vec![x]);
        assert!(data.info(ResourceId::new(42)).is_none());
    }
}
