//! Resource id types for type-safe arena indexing.

use serde::{Deserialize, Serialize};

/// A compact 32-bit index into the resource arena.
///
/// `u32::MAX` is reserved as the `OptionResourceId` none sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ResourceId(u32);

impl ResourceId {
    /// The root sentinel is always the first resource in the arena.
    pub const ROOT: Self = Self(0);

    /// Creates a new ResourceId from a usize.
    ///
    /// # Panics
    /// Panics if `index >= u32::MAX` (reserved for the none sentinel).
    #[inline]
    pub fn new(index: usize) -> Self {
        assert!(
            index < u32::MAX as usize,
            "resource index must be less than u32::MAX"
        );
        Self(index as u32)
    }

    /// Returns the index as a usize.
    #[inline]
    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

/// An optional resource id using u32::MAX as the None sentinel.
///
/// Fits in 4 bytes instead of the 8 that `Option<ResourceId>` needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct OptionResourceId(u32);

impl OptionResourceId {
    #[inline]
    pub fn none() -> Self {
        Self(u32::MAX)
    }

    #[inline]
    pub fn some(id: ResourceId) -> Self {
        Self(id.0)
    }

    #[inline]
    pub fn to_option(self) -> Option<ResourceId> {
        if self.0 == u32::MAX {
            None
        } else {
            Some(ResourceId(self.0))
        }
    }
}

impl Default for OptionResourceId {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_types() {
        let id = ResourceId::new(100);
        assert_eq!(id.get(), 100);
        assert_eq!(ResourceId::ROOT.get(), 0);

        assert_eq!(OptionResourceId::none().to_option(), None);
        assert_eq!(OptionResourceId::some(id).to_option(), Some(id));
        assert_eq!(OptionResourceId::default().to_option(), None);
    }

    #[test]
    fn option_resource_id_is_compact() {
        assert_eq!(std::mem::size_of::<OptionResourceId>(), 4);
    }

    #[test]
    #[should_panic(expected = "less than u32::MAX")]
    fn sentinel_index_is_rejected() {
        ResourceId::new(u32::MAX as usize);
    }
}
