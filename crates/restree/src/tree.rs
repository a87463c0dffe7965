//! The shared resource tree.
//!
//! ## Module Structure
//!
//! - `manager` - `Tree`: mounting, lookup and accessors
//! - `inflight` - Single-flight coordination of concurrent mounts
//! - `view` - Read guard for zero-copy traversal

mod inflight;
mod manager;
mod view;

pub use manager::Tree;
pub use view::TreeView;
