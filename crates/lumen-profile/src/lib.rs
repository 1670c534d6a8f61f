//! User profile persistence for LUMEN_OS.
//!
//! One serializable document per identity (guest, admin, or named account)
//! holds everything the desktop needs to restore a session: the VFS
//! snapshot, calendar, chats, settings, installed apps, shortcuts, widgets,
//! contacts, watchlist, app locks, and dock preferences. Guests persist to
//! the local key-value store; named identities round-trip through a remote
//! document store holding one identity-to-profile map; admin is session-only.

pub mod broker;
pub mod document;
pub mod passcode;
pub mod patch;
pub mod store;

pub use broker::{Identity, LoadOutcome, ProfileBroker, ProfileSession, SaveStatus};
pub use document::{
    CalendarEvent, ChatMessage, ChatRole, Contact, ExternalApp, LocalAppManifest, Profile,
    Settings, ShortcutEntry, Theme, WidgetInstance,
};
pub use patch::ProfilePatch;
pub use store::{
    DocumentStore, FileDocumentStore, FileKeyValueStore, KeyValueStore, MemoryDocumentStore,
    MemoryKeyValueStore,
};
