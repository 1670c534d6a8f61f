//! Profile load/save orchestration.
//!
//! The broker owns the storage backends and the identity rules: guests
//! persist locally, named identities round-trip through the remote
//! document (one JSON map of identity -> profile), admin is session-only.
//! Failures never propagate out of load/save; they degrade to an ephemeral
//! session and a logged warning, because the shell must stay interactive
//! when storage misbehaves.

use std::collections::HashMap;

use crate::document::Profile;
use crate::patch::ProfilePatch;
use crate::store::{DocumentStore, KeyValueStore};

/// Local-store key holding the saved guest profile.
const GUEST_KEY: &str = "lumen.guest-profile";

/// Who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Guest,
    Admin,
    Named(String),
}

impl Identity {
    /// Map a login string to an identity (`None` is a guest session).
    pub fn from_login(login: Option<&str>) -> Self {
        match login {
            None => Self::Guest,
            Some("admin") => Self::Admin,
            Some(name) => Self::Named(name.to_string()),
        }
    }

    fn storage_key(&self) -> &str {
        match self {
            Self::Guest => "__guest",
            Self::Admin => "__admin",
            Self::Named(name) => name,
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guest => write!(f, "guest"),
            Self::Admin => write!(f, "admin"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Result of loading a profile.
#[derive(Debug)]
pub struct LoadOutcome {
    pub profile: Profile,
    /// The remote side was unreachable or unconfigured and the session fell
    /// back to ephemeral defaults; the shell shows a one-time warning.
    pub degraded: bool,
    /// A named identity was seen for the first time and a default profile
    /// was persisted for it.
    pub created: bool,
}

/// What happened to a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Persisted to the identity's store.
    Written,
    /// Admin changes are session-only; nothing is persisted.
    SessionOnly,
    /// The save carried a version older than one already accepted for this
    /// identity and was dropped to protect the newer state.
    Discarded,
    /// Storage was unreachable or unconfigured; state stays in memory only.
    Degraded,
}

/// The live in-memory profile plus its update version counter.
///
/// Each [`ProfileSession::update`] applies a shallow top-level merge and
/// bumps the version; the owner forwards (profile, version) to
/// [`ProfileBroker::save`], whose version check discards stale in-flight
/// writes.
#[derive(Debug)]
pub struct ProfileSession {
    identity: Identity,
    profile: Profile,
    version: u64,
}

impl ProfileSession {
    pub fn new(identity: Identity, profile: Profile) -> Self {
        Self {
            identity,
            profile,
            version: 0,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a patch and return the new version.
    pub fn update(&mut self, patch: ProfilePatch) -> u64 {
        patch.apply(&mut self.profile);
        self.version += 1;
        self.version
    }
}

/// Storage orchestration for profile documents.
pub struct ProfileBroker {
    local: Box<dyn KeyValueStore>,
    remote: Option<Box<dyn DocumentStore>>,
    remote_doc: String,
    /// Highest accepted save version per identity storage key.
    accepted: HashMap<String, u64>,
}

impl ProfileBroker {
    pub fn new(
        local: Box<dyn KeyValueStore>,
        remote: Option<Box<dyn DocumentStore>>,
        remote_doc: impl Into<String>,
    ) -> Self {
        Self {
            local,
            remote,
            remote_doc: remote_doc.into(),
            accepted: HashMap::new(),
        }
    }

    /// Whether a remote store is configured at all.
    pub fn remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    /// Load the profile for an identity. Never fails: storage problems
    /// degrade to defaults with `degraded` set.
    pub fn load(&mut self, identity: &Identity) -> LoadOutcome {
        match identity {
            Identity::Guest => self.load_guest(),
            Identity::Admin => LoadOutcome {
                profile: Profile::admin(),
                degraded: false,
                created: false,
            },
            Identity::Named(name) => self.load_named(name),
        }
    }

    fn load_guest(&self) -> LoadOutcome {
        let profile = match self.local.get(GUEST_KEY) {
            Ok(Some(stored)) => Profile::from_stored_json(&stored).unwrap_or_else(|e| {
                log::warn!("saved guest profile unreadable, starting fresh: {e}");
                Profile::default()
            }),
            Ok(None) => Profile::default(),
            Err(e) => {
                log::warn!("local store unreadable, starting fresh: {e}");
                Profile::default()
            }
        };
        LoadOutcome {
            profile,
            degraded: false,
            created: false,
        }
    }

    fn load_named(&mut self, name: &str) -> LoadOutcome {
        let Some(remote) = self.remote.as_mut() else {
            log::warn!("remote store unconfigured; {name} gets an ephemeral session");
            return LoadOutcome {
                profile: Profile::default(),
                degraded: true,
                created: false,
            };
        };

        let mut map = match remote.fetch(&self.remote_doc) {
            Ok(Some(body)) => parse_profile_map(&body),
            Ok(None) => serde_json::Map::new(),
            Err(e) => {
                log::warn!("remote store unreachable: {e}");
                return LoadOutcome {
                    profile: Profile::default(),
                    degraded: true,
                    created: false,
                };
            }
        };

        if let Some(stored) = map.get(name) {
            let profile = Profile::from_stored_value(stored.clone()).unwrap_or_else(|e| {
                log::warn!("stored profile for {name} unreadable, resetting: {e}");
                Profile::default()
            });
            return LoadOutcome {
                profile,
                degraded: false,
                created: false,
            };
        }

        // First sight of this identity: persist a default profile for it.
        let profile = Profile::default();
        let created = match serde_json::to_value(&profile) {
            Ok(value) => {
                map.insert(name.to_string(), value);
                match remote.store(&self.remote_doc, &stringify_profile_map(&map)) {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("could not persist new profile for {name}: {e}");
                        false
                    }
                }
            }
            Err(e) => {
                log::warn!("could not serialize default profile: {e}");
                false
            }
        };
        LoadOutcome {
            profile,
            degraded: !created,
            created,
        }
    }

    /// Persist a profile at a given update version. Stale versions are
    /// discarded so an in-flight save can never clobber newer state.
    pub fn save(&mut self, identity: &Identity, profile: &Profile, version: u64) -> SaveStatus {
        let key = identity.storage_key().to_string();
        if let Some(floor) = self.accepted.get(&key) {
            if version <= *floor {
                log::debug!("discarding stale save for {identity} (v{version} <= v{floor})");
                return SaveStatus::Discarded;
            }
        }

        let status = match identity {
            Identity::Admin => SaveStatus::SessionOnly,
            Identity::Guest => self.save_guest(profile),
            Identity::Named(name) => self.save_named(name, profile),
        };
        if matches!(status, SaveStatus::Written) {
            self.accepted.insert(key, version);
        }
        status
    }

    fn save_guest(&mut self, profile: &Profile) -> SaveStatus {
        match serde_json::to_string(profile) {
            Ok(json) => match self.local.set(GUEST_KEY, &json) {
                Ok(()) => SaveStatus::Written,
                Err(e) => {
                    log::warn!("guest profile not saved: {e}");
                    SaveStatus::Degraded
                }
            },
            Err(e) => {
                log::warn!("guest profile not serializable: {e}");
                SaveStatus::Degraded
            }
        }
    }

    fn save_named(&mut self, name: &str, profile: &Profile) -> SaveStatus {
        let Some(remote) = self.remote.as_mut() else {
            log::warn!("remote store unconfigured; changes for {name} stay in memory");
            return SaveStatus::Degraded;
        };
        // Read-modify-write of the whole map: the only unit the store has.
        let mut map = match remote.fetch(&self.remote_doc) {
            Ok(Some(body)) => parse_profile_map(&body),
            Ok(None) => serde_json::Map::new(),
            Err(e) => {
                log::warn!("remote store unreachable: {e}");
                return SaveStatus::Degraded;
            }
        };
        match serde_json::to_value(profile) {
            Ok(value) => {
                map.insert(name.to_string(), value);
            }
            Err(e) => {
                log::warn!("profile for {name} not serializable: {e}");
                return SaveStatus::Degraded;
            }
        }
        match remote.store(&self.remote_doc, &stringify_profile_map(&map)) {
            Ok(()) => SaveStatus::Written,
            Err(e) => {
                log::warn!("remote store write failed: {e}");
                SaveStatus::Degraded
            }
        }
    }

    /// Drop the saved guest profile (used when promoting a guest to a named
    /// account).
    pub fn clear_guest(&mut self) {
        if let Err(e) = self.local.remove(GUEST_KEY) {
            log::warn!("could not clear guest profile: {e}");
        }
    }
}

fn parse_profile_map(body: &str) -> serde_json::Map<String, serde_json::Value> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            log::warn!("remote document is not a profile map, treating as empty");
            serde_json::Map::new()
        }
    }
}

fn stringify_profile_map(map: &serde_json::Map<String, serde_json::Value>) -> String {
    serde_json::Value::Object(map.clone()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Settings, Theme};
    use crate::store::{MemoryDocumentStore, MemoryKeyValueStore};
    use lumen_types::error::{LumenError, Result};

    /// Remote store whose every call fails.
    struct UnreachableDocumentStore;

    impl DocumentStore for UnreachableDocumentStore {
        fn fetch(&self, _name: &str) -> Result<Option<String>> {
            Err(LumenError::Storage("connection refused".into()))
        }

        fn store(&mut self, _name: &str, _contents: &str) -> Result<()> {
            Err(LumenError::Storage("connection refused".into()))
        }
    }

    /// Remote store that panics if touched, for "no call attempted"
    /// assertions.
    struct ForbiddenDocumentStore;

    impl DocumentStore for ForbiddenDocumentStore {
        fn fetch(&self, _name: &str) -> Result<Option<String>> {
            panic!("remote store consulted for a guest session");
        }

        fn store(&mut self, _name: &str, _contents: &str) -> Result<()> {
            panic!("remote store written for a guest session");
        }
    }

    fn local_broker() -> ProfileBroker {
        ProfileBroker::new(Box::new(MemoryKeyValueStore::new()), None, "profiles.json")
    }

    fn remote_broker() -> ProfileBroker {
        ProfileBroker::new(
            Box::new(MemoryKeyValueStore::new()),
            Some(Box::new(MemoryDocumentStore::new())),
            "profiles.json",
        )
    }

    #[test]
    fn identity_from_login() {
        assert_eq!(Identity::from_login(None), Identity::Guest);
        assert_eq!(Identity::from_login(Some("admin")), Identity::Admin);
        assert_eq!(
            Identity::from_login(Some("alice")),
            Identity::Named("alice".to_string())
        );
    }

    #[test]
    fn guest_loads_default_first_time() {
        let mut broker = local_broker();
        let outcome = broker.load(&Identity::Guest);
        assert_eq!(outcome.profile, Profile::default());
        assert!(!outcome.degraded);
        assert!(!outcome.created);
    }

    #[test]
    fn guest_save_then_load_roundtrips() {
        let mut broker = local_broker();
        let mut profile = Profile::default();
        profile.settings.wallpaper = "dunes".to_string();
        assert_eq!(
            broker.save(&Identity::Guest, &profile, 1),
            SaveStatus::Written
        );
        let outcome = broker.load(&Identity::Guest);
        assert_eq!(outcome.profile.settings.wallpaper, "dunes");
    }

    #[test]
    fn corrupt_guest_document_falls_back_to_default() {
        let mut local = MemoryKeyValueStore::new();
        local.set(GUEST_KEY, "{corrupt").unwrap();
        let mut broker = ProfileBroker::new(Box::new(local), None, "profiles.json");
        let outcome = broker.load(&Identity::Guest);
        assert_eq!(outcome.profile, Profile::default());
    }

    #[test]
    fn admin_is_fixed_and_session_only() {
        let mut broker = local_broker();
        let outcome = broker.load(&Identity::Admin);
        assert_eq!(outcome.profile, Profile::admin());
        let status = broker.save(&Identity::Admin, &outcome.profile, 1);
        assert_eq!(status, SaveStatus::SessionOnly);
        // Nothing landed in the local store.
        let reloaded = broker.load(&Identity::Guest);
        assert_eq!(reloaded.profile, Profile::default());
    }

    #[test]
    fn named_first_sight_creates_and_persists() {
        let mut broker = remote_broker();
        let outcome = broker.load(&Identity::Named("alice".to_string()));
        assert!(outcome.created);
        assert!(!outcome.degraded);
        assert_eq!(outcome.profile, Profile::default());
        // A second load now finds the stored profile.
        let again = broker.load(&Identity::Named("alice".to_string()));
        assert!(!again.created);
    }

    #[test]
    fn named_save_preserves_other_identities() {
        let seed = serde_json::json!({
            "bob": {"settings": {"wallpaper": "bobs", "theme": "dark"}}
        })
        .to_string();
        let mut broker = ProfileBroker::new(
            Box::new(MemoryKeyValueStore::new()),
            Some(Box::new(MemoryDocumentStore::with_document(
                "profiles.json",
                &seed,
            ))),
            "profiles.json",
        );
        let mut alice = Profile::default();
        alice.settings.wallpaper = "alices".to_string();
        assert_eq!(
            broker.save(&Identity::Named("alice".to_string()), &alice, 1),
            SaveStatus::Written
        );
        let bob = broker.load(&Identity::Named("bob".to_string()));
        assert_eq!(bob.profile.settings.wallpaper, "bobs");
        let alice_back = broker.load(&Identity::Named("alice".to_string()));
        assert_eq!(alice_back.profile.settings.wallpaper, "alices");
    }

    #[test]
    fn named_load_merges_defaults_into_old_document() {
        let seed = serde_json::json!({
            "carol": {"settings": {"wallpaper": "retro", "theme": "light"}}
        })
        .to_string();
        let mut broker = ProfileBroker::new(
            Box::new(MemoryKeyValueStore::new()),
            Some(Box::new(MemoryDocumentStore::with_document(
                "profiles.json",
                &seed,
            ))),
            "profiles.json",
        );
        let outcome = broker.load(&Identity::Named("carol".to_string()));
        assert_eq!(outcome.profile.settings.wallpaper, "retro");
        assert_eq!(outcome.profile.settings.theme, Theme::Light);
        // Fields the old document never stored come back as defaults.
        assert_eq!(outcome.profile.watchlist, Profile::default().watchlist);
    }

    #[test]
    fn unconfigured_remote_degrades_to_guest_defaults() {
        let mut broker = local_broker();
        let outcome = broker.load(&Identity::Named("alice".to_string()));
        assert!(outcome.degraded);
        assert_eq!(outcome.profile, Profile::default());
        let status = broker.save(&Identity::Named("alice".to_string()), &outcome.profile, 1);
        assert_eq!(status, SaveStatus::Degraded);
    }

    #[test]
    fn unreachable_remote_degrades() {
        let mut broker = ProfileBroker::new(
            Box::new(MemoryKeyValueStore::new()),
            Some(Box::new(UnreachableDocumentStore)),
            "profiles.json",
        );
        let outcome = broker.load(&Identity::Named("alice".to_string()));
        assert!(outcome.degraded);
        let status = broker.save(&Identity::Named("alice".to_string()), &outcome.profile, 1);
        assert_eq!(status, SaveStatus::Degraded);
    }

    #[test]
    fn guest_session_never_touches_remote() {
        let mut broker = ProfileBroker::new(
            Box::new(MemoryKeyValueStore::new()),
            Some(Box::new(ForbiddenDocumentStore)),
            "profiles.json",
        );
        let outcome = broker.load(&Identity::Guest);
        assert!(!outcome.degraded);
        assert_eq!(
            broker.save(&Identity::Guest, &outcome.profile, 1),
            SaveStatus::Written
        );
    }

    #[test]
    fn stale_save_is_discarded() {
        let mut broker = local_broker();
        let profile = Profile::default();
        assert_eq!(broker.save(&Identity::Guest, &profile, 1), SaveStatus::Written);
        assert_eq!(
            broker.save(&Identity::Guest, &profile, 1),
            SaveStatus::Discarded
        );
        assert_eq!(broker.save(&Identity::Guest, &profile, 2), SaveStatus::Written);
        assert_eq!(
            broker.save(&Identity::Guest, &profile, 1),
            SaveStatus::Discarded
        );
    }

    #[test]
    fn version_floors_are_per_identity() {
        let mut broker = remote_broker();
        let profile = Profile::default();
        assert_eq!(broker.save(&Identity::Guest, &profile, 5), SaveStatus::Written);
        // A lower version for a different identity is still fresh.
        assert_eq!(
            broker.save(&Identity::Named("alice".to_string()), &profile, 1),
            SaveStatus::Written
        );
    }

    #[test]
    fn clear_guest_removes_saved_profile() {
        let mut broker = local_broker();
        broker.save(&Identity::Guest, &Profile::default(), 1);
        broker.clear_guest();
        let outcome = broker.load(&Identity::Guest);
        assert_eq!(outcome.profile, Profile::default());
    }

    #[test]
    fn session_update_bumps_version_and_applies() {
        let mut session = ProfileSession::new(Identity::Guest, Profile::default());
        assert_eq!(session.version(), 0);
        let v = session.update(ProfilePatch::settings(Settings {
            wallpaper: "dunes".to_string(),
            theme: Theme::Dark,
        }));
        assert_eq!(v, 1);
        assert_eq!(session.profile().settings.wallpaper, "dunes");
        let v2 = session.update(ProfilePatch::default());
        assert_eq!(v2, 2);
    }

    #[test]
    fn update_then_save_flow() {
        let mut broker = remote_broker();
        let identity = Identity::Named("alice".to_string());
        let outcome = broker.load(&identity);
        let mut session = ProfileSession::new(identity.clone(), outcome.profile);
        let v = session.update(ProfilePatch::settings(Settings {
            wallpaper: "dunes".to_string(),
            theme: Theme::Auto,
        }));
        assert_eq!(
            broker.save(&identity, session.profile(), v),
            SaveStatus::Written
        );
        let back = broker.load(&identity);
        assert_eq!(back.profile.settings.wallpaper, "dunes");
    }
}
