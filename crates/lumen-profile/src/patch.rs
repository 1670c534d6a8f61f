//! Typed shallow-merge profile updates.
//!
//! Every mutation of the live profile flows through [`ProfilePatch`]: set
//! the top-level fields to replace, leave the rest `None`. The merge is
//! shallow by contract: a patched nested object replaces the stored one
//! wholesale, so callers must spread nested state themselves before
//! patching (matching the document's top-level merge semantics).

use std::collections::BTreeMap;

use lumen_vfs::NodeSnapshot;

use crate::document::{
    CalendarEvent, ChatMessage, Contact, ExternalApp, LocalAppManifest, Profile, Settings,
    ShortcutEntry, WidgetInstance,
};

/// A partial profile: `Some` fields replace, `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub vfs: Option<NodeSnapshot>,
    pub calendar_events: Option<BTreeMap<String, Vec<CalendarEvent>>>,
    pub chats: Option<BTreeMap<String, Vec<ChatMessage>>>,
    pub settings: Option<Settings>,
    pub external_apps: Option<Vec<ExternalApp>>,
    pub local_apps: Option<Vec<LocalAppManifest>>,
    pub shortcuts: Option<Vec<ShortcutEntry>>,
    pub widgets: Option<Vec<WidgetInstance>>,
    pub contacts: Option<Vec<Contact>>,
    pub watchlist: Option<Vec<String>>,
    pub locked_apps: Option<Vec<String>>,
    pub passcode_hash: Option<Option<String>>,
    pub dock_hidden: Option<Vec<String>>,
}

impl ProfilePatch {
    /// Patch carrying only a VFS snapshot (the per-edit persistence path).
    pub fn vfs(snapshot: NodeSnapshot) -> Self {
        Self {
            vfs: Some(snapshot),
            ..Self::default()
        }
    }

    /// Patch carrying only settings.
    pub fn settings(settings: Settings) -> Self {
        Self {
            settings: Some(settings),
            ..Self::default()
        }
    }

    /// Apply onto a profile: shallow replacement of each `Some` field.
    pub fn apply(self, profile: &mut Profile) {
        if let Some(vfs) = self.vfs {
            profile.vfs = vfs;
        }
        if let Some(calendar_events) = self.calendar_events {
            profile.calendar_events = calendar_events;
        }
        if let Some(chats) = self.chats {
            profile.chats = chats;
        }
        if let Some(settings) = self.settings {
            profile.settings = settings;
        }
        if let Some(external_apps) = self.external_apps {
            profile.external_apps = external_apps;
        }
        if let Some(local_apps) = self.local_apps {
            profile.local_apps = local_apps;
        }
        if let Some(shortcuts) = self.shortcuts {
            profile.shortcuts = shortcuts;
        }
        if let Some(widgets) = self.widgets {
            profile.widgets = widgets;
        }
        if let Some(contacts) = self.contacts {
            profile.contacts = contacts;
        }
        if let Some(watchlist) = self.watchlist {
            profile.watchlist = watchlist;
        }
        if let Some(locked_apps) = self.locked_apps {
            profile.locked_apps = locked_apps;
        }
        if let Some(passcode_hash) = self.passcode_hash {
            profile.passcode_hash = passcode_hash;
        }
        if let Some(dock_hidden) = self.dock_hidden {
            profile.dock_hidden = dock_hidden;
        }
    }

    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.vfs.is_none()
            && self.calendar_events.is_none()
            && self.chats.is_none()
            && self.settings.is_none()
            && self.external_apps.is_none()
            && self.local_apps.is_none()
            && self.shortcuts.is_none()
            && self.widgets.is_none()
            && self.contacts.is_none()
            && self.watchlist.is_none()
            && self.locked_apps.is_none()
            && self.passcode_hash.is_none()
            && self.dock_hidden.is_none()
    }
}
