//! Engine - the shell's node tree.
//!
//! The guard's exemption walk runs over this tree: every visible region of
//! the shell is a node with a parent link, an optional select-text marker,
//! and optional text content.

mod registry;

pub use registry::*;
