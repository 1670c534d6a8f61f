//! Virtual file system for LUMEN_OS.
//!
//! The tree backing the Finder/Documents experience: files hold opaque text,
//! directories hold children, app shortcuts reference a launchable app id.
//! Nodes live in an arena addressed by stable string ids with parent links,
//! so edits are O(depth) rather than O(tree size). Persistence goes through
//! [`NodeSnapshot`], a nested tagged tree embedded in the profile document;
//! callers take a fresh snapshot after every mutation.

pub mod path;
pub mod snapshot;
mod tree;

pub use snapshot::NodeSnapshot;
pub use tree::{Node, NodeId, NodeKind, NodePayload, Vfs};
