//! Read guard over the tree data.

use std::ops::Deref;

use parking_lot::RwLockReadGuard;

use crate::indexer::TreeData;

/// Shared access to the tree for traversals that borrow resources.
///
/// Mounts wait for the write lock while a view is alive, so keep views short.
pub struct TreeView<'a> {
    data: RwLockReadGuard<'a, TreeData>,
}

impl<'a> TreeView<'a> {
    pub(crate) fn new(data: RwLockReadGuard<'a, TreeData>) -> Self {
        Self { data }
    }
}

impl Deref for TreeView<'_> {
    type Target = TreeData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
