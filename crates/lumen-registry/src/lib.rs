//! App catalog and launcher for LUMEN_OS.
//!
//! The built-in set is a closed enum, statically checkable; installed
//! external apps, sideloaded local apps, and user shortcuts layer on top as
//! validated descriptors. `resolve_launch` routes open requests through
//! file-association rules before any window exists.

pub mod catalog;
pub mod launch;
pub mod manifest;

pub use catalog::{AppDescriptor, AppRegistry, BuiltinApp};
pub use launch::{LaunchTarget, resolve_launch};
pub use manifest::{MANIFEST_EXT, install_manifest, parse_manifest};
