//! Mount indexing.
//!
//! A mount runs in two phases:
//! 1. **Read phase** (`walk`): builds a private `Node` tree from the filesystem,
//!    children already in sibling order. No lock is held.
//! 2. **Graft phase** (`construct`): under the tree's write lock, synthesizes
//!    the virtual ancestors of the mount root and inserts every node into the
//!    arena and the path index.
//!
//! ## Module Structure
//!
//! - `walk` - Recursive subtree read
//! - `construct` - Ancestor synthesis and grafting
//! - `data` - Arena plus path index (`TreeData`)

mod construct;
mod data;
mod walk;

pub(crate) use construct::graft_mount;
pub use data::TreeData;
pub use walk::{read_mount_root, Node, WalkData};
