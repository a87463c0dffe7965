//! Tree - main API for mounting and resolving resources.

use std::panic;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use parking_lot::RwLock;

use super::inflight::{Flight, InFlight};
use super::view::TreeView;
use crate::config::TreeConfig;
use crate::error::{normalize_path, Result, TreeError};
use crate::fs::{FileSystem, OsFileSystem};
use crate::indexer::{graft_mount, read_mount_root, TreeData, WalkData};
use crate::storage::{ResourceFlags, ResourceId};
use crate::types::{ResourceInfo, TreeStats};

/// Path-indexed mirror of the mounted filesystem subtrees.
///
/// `Tree` is `Send + Sync`; mounts and lookups may be issued from any number
/// of threads. Lookups share a read lock with the fast path of `mount`, and
/// each mount takes the write lock once to publish its subtree.
pub struct Tree {
    data: RwLock<TreeData>,
    config: TreeConfig,
    filesystem: Box<dyn FileSystem>,
    inflight: InFlight,
    reads: AtomicUsize,
    read_errors: AtomicUsize,
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("config", &self.config)
            .field("resources", &self.data.read().len())
            .field("reads", &self.reads.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates an empty tree over the host filesystem.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_filesystem(config, OsFileSystem)
    }

    /// Creates an empty tree that reads through `filesystem`.
    pub fn with_filesystem(config: TreeConfig, filesystem: impl FileSystem + 'static) -> Self {
        Self {
            data: RwLock::new(TreeData::with_capacity(config.initial_capacity)),
            config,
            filesystem: Box::new(filesystem),
            inflight: InFlight::default(),
            reads: AtomicUsize::new(0),
            read_errors: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Mounts the directory at the absolute `path`.
    ///
    /// Returns the existing resource if the path is already materialized.
    /// Otherwise reads the whole subtree, synthesizes missing ancestors as
    /// virtual directories and publishes everything in one batch.
    pub fn mount(&self, path: impl AsRef<Path>) -> Result<ResourceId> {
        let path = self.mount_path(path.as_ref())?;

        if let Some(id) = self.materialized(&path) {
            log::debug!("mount of {} already indexed", path.display());
            return Ok(id);
        }

        if !self.config.single_flight {
            return self.read_and_graft(&path);
        }

        match self.inflight.begin(&path) {
            Flight::Leader(_guard) => {
                // A previous leader may have finished between the check above
                // and taking leadership.
                if let Some(id) = self.materialized(&path) {
                    return Ok(id);
                }
                self.read_and_graft(&path)
            }
            // A rayon worker must not block here: while the leader's read
            // waits on stolen jobs, its own thread may run this follower.
            Flight::Follower(_) if rayon::current_thread_index().is_some() => {
                log::debug!("mount of {} in flight, reading on rayon worker", path.display());
                self.read_and_graft(&path)
            }
            Flight::Follower(call) => {
                log::debug!("waiting for in-flight mount of {}", path.display());
                call.wait();
                match self.materialized(&path) {
                    Some(id) => Ok(id),
                    None => self.read_and_graft(&path),
                }
            }
        }
    }

    /// Mounts every path concurrently, one scoped thread per path.
    ///
    /// Results keep the input order. Failures are logged and returned.
    /// Repeated paths are safe: their mounts share one read.
    pub fn mount_all<P>(&self, paths: &[P]) -> Vec<(PathBuf, Result<ResourceId>)>
    where
        P: AsRef<Path> + Sync,
    {
        thread::scope(|scope| {
            let handles: Vec<_> = paths
                .iter()
                .map(|path| {
                    let path = path.as_ref();
                    scope.spawn(move || {
                        let result = self.mount(path);
                        if let Err(error) = &result {
                            log::warn!("mount of {} failed: {}", path.display(), error);
                        }
                        (path.to_path_buf(), result)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect()
        })
    }

    /// Resolves an absolute path to its resource.
    pub fn lookup(&self, path: impl AsRef<Path>) -> Option<ResourceId> {
        let path = normalize_path(path.as_ref()).ok()?;
        self.data.read().lookup(&path)
    }

    /// Takes the read lock for borrowing traversals.
    pub fn read(&self) -> TreeView<'_> {
        TreeView::new(self.data.read())
    }

    pub fn path_of(&self, id: ResourceId) -> Option<PathBuf> {
        self.data.read().path(id)
    }

    /// Children in sibling order, or `None` for an unknown id.
    pub fn children_of(&self, id: ResourceId) -> Option<Vec<ResourceId>> {
        let data = self.data.read();
        data.get(id).map(|resource| resource.children().to_vec())
    }

    pub fn flags_of(&self, id: ResourceId) -> Option<ResourceFlags> {
        self.data.read().get(id).map(|resource| resource.flags())
    }

    pub fn parent_of(&self, id: ResourceId) -> Option<ResourceId> {
        self.data.read().get(id).and_then(|resource| resource.parent())
    }

    pub fn info(&self, id: ResourceId) -> Option<ResourceInfo> {
        self.data.read().info(id)
    }

    pub fn info_for_path(&self, path: impl AsRef<Path>) -> Option<ResourceInfo> {
        let path = normalize_path(path.as_ref()).ok()?;
        let data = self.data.read();
        data.info(data.lookup(&path)?)
    }

    /// Number of indexed resources, the root sentinel included.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Always false: the root sentinel is indexed from the start.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            reads: self.reads.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            ..self.data.read().stats()
        }
    }

    fn mount_path(&self, path: &Path) -> Result<PathBuf> {
        let normalized = normalize_path(path)?;
        if !self.config.canonicalize_mounts {
            return Ok(normalized);
        }
        self.filesystem
            .canonicalize(&normalized)
            .map_err(|error| TreeError::from_stat(&normalized, error))
    }

    /// Returns the resource at `path` if a mount would not need to read it.
    fn materialized(&self, path: &Path) -> Option<ResourceId> {
        let data = self.data.read();
        let id = data.lookup(path)?;
        if self.config.promote_virtual && data.get(id)?.is_virtual() {
            return None;
        }
        Some(id)
    }

    fn read_and_graft(&self, path: &Path) -> Result<ResourceId> {
        let started = Instant::now();

        let is_dir = self
            .filesystem
            .is_dir(path)
            .map_err(|error| TreeError::from_stat(path, error))?;
        if !is_dir {
            return Err(TreeError::NotADirectory(path.to_path_buf()));
        }

        let walk_data = WalkData::new(self.filesystem.as_ref(), &self.config);
        let root = read_mount_root(path, &walk_data)?;

        let id = {
            let mut data = self.data.write();
            graft_mount(&mut data, root)?
        };

        // Only reads that landed in the index are counted.
        self.reads.fetch_add(1, Ordering::Relaxed);
        let errors = walk_data.errors.load(Ordering::Relaxed);
        self.read_errors.fetch_add(errors, Ordering::Relaxed);

        log::info!(
            "mounted {} dirs={} files={} errors={} elapsed_ms={}",
            path.display(),
            walk_data.num_dirs.load(Ordering::Relaxed),
            walk_data.num_files.load(Ordering::Relaxed),
            errors,
            started.elapsed().as_millis(),
        );
        Ok(id)
    }
}
