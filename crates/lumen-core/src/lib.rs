//! LUMEN_OS core framework.
//!
//! Session orchestration over the subsystem crates: configuration, the
//! login/logout lifecycle, the app launch pipeline with its passcode gate,
//! and the calendar notification scan. The session context is the single
//! owner of the live VFS, window manager, profile, and notification feed;
//! it is created at login and torn down at logout.

// Re-exports from the subsystem crates.
pub use lumen_types::clock;
pub use lumen_types::error;
pub use lumen_types::geometry;
pub use lumen_profile as profile;
pub use lumen_registry as registry;
pub use lumen_shell as shell;
pub use lumen_vfs as vfs;
pub use lumen_wm as wm;

pub mod applock;
pub mod calendar;
pub mod config;
pub mod session;

pub use applock::{AppLockGate, LockChallenge, PendingOpen};
pub use config::LumenConfig;
pub use session::{OpenOutcome, Session};
