//! Filesystem access used by mounts.
//!
//! Reads go through the [`FileSystem`] trait so a tree can be populated from
//! something other than the host filesystem. [`OsFileSystem`] is the default.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// The final path segment.
    pub name: OsString,
    /// Whether the entry itself is a directory. Symlinks are not followed.
    pub is_dir: bool,
}

impl DirEntryInfo {
    pub fn new(name: impl Into<OsString>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }
}

/// Blocking filesystem operations needed to mirror a subtree.
pub trait FileSystem: Send + Sync {
    /// Returns whether `path` is a directory, following symlinks.
    fn is_dir(&self, path: &Path) -> io::Result<bool>;

    /// Lists the immediate entries of the directory at `path`.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;

    /// Resolves symlinks in `path`.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_dir(&self, path: &Path) -> io::Result<bool> {
        fs::metadata(path).map(|metadata| metadata.is_dir())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // An entry whose type cannot be determined is kept as a leaf.
            let is_dir = match entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(error) => {
                    log::warn!(
                        "unable to determine type of {}: {}",
                        entry.path().display(),
                        error
                    );
                    false
                }
            };
            entries.push(DirEntryInfo {
                name: entry.file_name(),
                is_dir,
            });
        }
        Ok(entries)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}
