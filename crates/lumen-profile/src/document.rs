//! The profile document and its embedded record types.
//!
//! Every field carries a serde default so documents written by older builds
//! load cleanly: loading merges defaults first, stored values second (see
//! [`Profile::from_stored_json`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lumen_types::error::Result;
use lumen_vfs::{NodePayload, NodeSnapshot, Vfs};

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

/// Desktop appearance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_wallpaper")]
    pub wallpaper: String,
    #[serde(default)]
    pub theme: Theme,
}

fn default_wallpaper() -> String {
    "aurora".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wallpaper: default_wallpaper(),
            theme: Theme::default(),
        }
    }
}

/// One calendar entry, keyed in the document by its `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// Optional `HH:MM` start time; all-day events omit it.
    #[serde(default)]
    pub time: Option<String>,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in an AI chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// An installed third-party app hosted in an iframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalApp {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A sideloaded local app, installed from a `.arsapp` manifest file.
/// `component_id` and `icon_id` must match the build-time allow-lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalAppManifest {
    pub id: String,
    pub title: String,
    pub component_id: String,
    pub icon_id: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A user-created URI launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutEntry {
    pub id: String,
    pub title: String,
    pub uri: String,
}

/// One placed desktop widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    pub id: String,
    pub widget_id: String,
}

/// Address-book entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// The complete serializable state for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_vfs_snapshot")]
    pub vfs: NodeSnapshot,
    /// `YYYY-MM-DD` date -> events on that day.
    #[serde(default)]
    pub calendar_events: BTreeMap<String, Vec<CalendarEvent>>,
    /// Conversation id -> message history.
    #[serde(default)]
    pub chats: BTreeMap<String, Vec<ChatMessage>>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub external_apps: Vec<ExternalApp>,
    #[serde(default)]
    pub local_apps: Vec<LocalAppManifest>,
    #[serde(default)]
    pub shortcuts: Vec<ShortcutEntry>,
    #[serde(default)]
    pub widgets: Vec<WidgetInstance>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,
    /// App ids gated behind the passcode.
    #[serde(default)]
    pub locked_apps: Vec<String>,
    /// FNV-1a/64 hex digest of the passcode; `None` until one is set.
    #[serde(default)]
    pub passcode_hash: Option<String>,
    /// App ids hidden from the dock.
    #[serde(default)]
    pub dock_hidden: Vec<String>,
}

fn default_watchlist() -> Vec<String> {
    ["AAPL", "MSFT", "NVDA"].map(String::from).to_vec()
}

/// Initial VFS layout for a fresh profile: the standard folders plus a
/// welcome note.
pub fn default_vfs_snapshot() -> NodeSnapshot {
    let mut vfs = Vfs::new();
    for folder in ["Desktop", "Documents", "Pictures", "Applications"] {
        // Infallible on a fresh tree.
        let _ = vfs.create("/", folder, NodePayload::Directory);
    }
    let _ = vfs.create(
        "/Documents",
        "welcome.txt",
        NodePayload::File {
            content: "Welcome to LUMEN_OS.\n\nYour files live here.".to_string(),
        },
    );
    vfs.snapshot()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            vfs: default_vfs_snapshot(),
            calendar_events: BTreeMap::new(),
            chats: BTreeMap::new(),
            settings: Settings::default(),
            external_apps: Vec::new(),
            local_apps: Vec::new(),
            shortcuts: Vec::new(),
            widgets: Vec::new(),
            contacts: Vec::new(),
            watchlist: default_watchlist(),
            locked_apps: Vec::new(),
            passcode_hash: None,
            dock_hidden: Vec::new(),
        }
    }
}

impl Profile {
    /// The fixed admin profile: fully unlocked, session-only.
    pub fn admin() -> Self {
        Self {
            locked_apps: Vec::new(),
            passcode_hash: None,
            ..Self::default()
        }
    }

    /// Parse a stored document, merging defaults first and stored values
    /// second so fields introduced after the document was written come back
    /// as their defaults instead of being lost.
    pub fn from_stored_json(stored: &str) -> Result<Self> {
        let stored_value: serde_json::Value = serde_json::from_str(stored)?;
        Ok(Self::from_stored_value(stored_value)?)
    }

    /// Same defaults-then-override merge over an already-parsed value.
    pub fn from_stored_value(stored: serde_json::Value) -> serde_json::Result<Self> {
        let mut base = serde_json::to_value(Self::default())
            .expect("default profile always serializes");
        if let (Some(base_map), Some(stored_map)) = (base.as_object_mut(), stored.as_object()) {
            for (key, value) in stored_map {
                base_map.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(base)
    }
}
