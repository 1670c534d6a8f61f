//! Shell chrome state for LUMEN_OS.
//!
//! Pure state machines behind the desktop furniture: the dock, spotlight
//! search, mission control, and the notification center. Everything here
//! consumes the window manager and registry contracts; nothing renders.

pub mod dock;
pub mod mission;
pub mod notifications;
pub mod spotlight;

pub use dock::{DockItem, dock_items};
pub use mission::MissionControl;
pub use notifications::{Notification, NotificationCenter, NotificationKind};
pub use spotlight::{SpotlightHit, SpotlightState, search};
