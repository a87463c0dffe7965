//! Append-only arena of resources.

use std::ops::Index;
use std::slice;

use super::index_types::ResourceId;
use super::resource::Resource;

/// Resources addressed by [`ResourceId`].
///
/// Ids are stable: resources are never removed or moved, so an id handed out
/// once identifies the same resource for the lifetime of the arena.
#[derive(Debug, Default)]
pub struct Arena {
    resources: Vec<Resource>,
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            resources: Vec::with_capacity(capacity),
        }
    }

    /// Appends a resource, returning its id.
    pub fn insert(&mut self, resource: Resource) -> ResourceId {
        let id = ResourceId::new(self.resources.len());
        self.resources.push(resource);
        id
    }

    #[inline]
    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.get())
    }

    #[inline]
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.resources.get_mut(id.get())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> ArenaIter<'_> {
        ArenaIter(self.resources.iter().enumerate())
    }
}

impl Index<ResourceId> for Arena {
    type Output = Resource;

    fn index(&self, id: ResourceId) -> &Self::Output {
        &self.resources[id.get()]
    }
}

/// Iterator over `(id, resource)` pairs in insertion order.
pub struct ArenaIter<'a>(std::iter::Enumerate<slice::Iter<'a, Resource>>);

impl<'a> Iterator for ArenaIter<'a> {
    type Item = (ResourceId, &'a Resource);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|(index, resource)| (ResourceId::new(index), resource))
    }
}
