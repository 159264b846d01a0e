//! Live-tree half of the sprig UI toolkit: an arena-backed document tree,
//! the builder and positional reconciler that realize `sprig-core` node
//! trees, and the mount that runs the render loop.

pub mod build;
pub mod mount;
pub mod patch;
pub mod tree;

pub use build::build;
pub use mount::{Mount, MountError};
pub use patch::patch;
pub use tree::{DomError, DomOp, DomTree, NodeId, Prop};
