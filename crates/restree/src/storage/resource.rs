//! Resource nodes stored in the arena.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use thin_vec::ThinVec;

use super::index_types::{OptionResourceId, ResourceId};

bitflags! {
    /// Type flags carried by every resource.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResourceFlags: u32 {
        /// The resource is a directory and has a [`Directory`] payload.
        const DIRECTORY = 1 << 0;
        /// Synthesized ancestor, not backed by a mount or read.
        const VIRTUAL = 1 << 1;
        /// Created directly by a mount.
        const MOUNT_ROOT = 1 << 2;
    }
}

/// Directory payload: the cached absolute path and the ordered children.
#[derive(Debug, Clone)]
pub struct Directory {
    path: PathBuf,
    pub(crate) children: ThinVec<ResourceId>,
}

impl Directory {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            children: ThinVec::new(),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Children in sibling order.
    #[inline]
    pub fn children(&self) -> &[ResourceId] {
        &self.children
    }
}

/// One filesystem entry, or a virtual path segment.
///
/// The parent link is a back-reference used to rebuild paths. Children are
/// owned by the parent directory's child list.
#[derive(Debug, Clone)]
pub struct Resource {
    name: OsString,
    pub(crate) flags: ResourceFlags,
    parent: OptionResourceId,
    directory: Option<Directory>,
}

impl Resource {
    /// Creates the root sentinel: empty name, no parent, cached path `/`.
    pub fn root(path: PathBuf) -> Self {
        Self {
            name: OsString::new(),
            flags: ResourceFlags::DIRECTORY | ResourceFlags::VIRTUAL,
            parent: OptionResourceId::none(),
            directory: Some(Directory::new(path)),
        }
    }

    /// Creates a directory resource. `DIRECTORY` is always set.
    pub fn directory(
        name: OsString,
        parent: ResourceId,
        path: PathBuf,
        flags: ResourceFlags,
    ) -> Self {
        Self {
            name,
            flags: flags | ResourceFlags::DIRECTORY,
            parent: OptionResourceId::some(parent),
            directory: Some(Directory::new(path)),
        }
    }

    /// Creates a non-directory resource.
    pub fn leaf(name: OsString, parent: ResourceId) -> Self {
        Self {
            name,
            flags: ResourceFlags::empty(),
            parent: OptionResourceId::some(parent),
            directory: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn flags(&self) -> ResourceFlags {
        self.flags
    }

    /// Returns the parent resource, or `None` for the root sentinel.
    #[inline]
    pub fn parent(&self) -> Option<ResourceId> {
        self.parent.to_option()
    }

    #[inline]
    pub fn directory_payload(&self) -> Option<&Directory> {
        self.directory.as_ref()
    }

    #[inline]
    pub(crate) fn directory_payload_mut(&mut self) -> Option<&mut Directory> {
        self.directory.as_mut()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags.contains(ResourceFlags::DIRECTORY)
    }

    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.flags.contains(ResourceFlags::VIRTUAL)
    }

    #[inline]
    pub fn is_mount_root(&self) -> bool {
        self.flags.contains(ResourceFlags::MOUNT_ROOT)
    }

    /// Cached path of a directory resource.
    #[inline]
    pub fn cached_path(&self) -> Option<&Path> {
        self.directory.as_ref().map(Directory::path)
    }

    /// Children in sibling order; empty for non-directories.
    #[inline]
    pub fn children(&self) -> &[ResourceId] {
        self.directory
            .as_ref()
            .map(Directory::children)
            .unwrap_or_default()
    }
}
