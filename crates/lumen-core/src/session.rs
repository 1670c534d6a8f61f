//! The session context: the single owner of all live desktop state.
//!
//! Created at login, torn down at logout. Switching identity replaces the
//! session wholesale; the only state that crosses identities is the guest
//! profile at the explicit promote-guest point. Every failure path in the
//! launch pipeline terminates in a notification or a logged no-op.

use std::collections::HashSet;

use lumen_profile::{
    Identity, Profile, ProfileBroker, ProfilePatch, ProfileSession, SaveStatus, passcode,
};
use lumen_registry::{AppDescriptor, AppRegistry, LaunchTarget, install_manifest, resolve_launch};
use lumen_shell::{DockItem, NotificationCenter, SpotlightHit, dock_items, spotlight};
use lumen_types::clock::Clock;
use lumen_types::error::Result;
use lumen_vfs::{NodeId, NodePayload, Vfs};
use lumen_wm::{OpenRequest, WindowManager, WindowRecord};

use crate::applock::{AppLockGate, LockChallenge, PendingOpen};
use crate::calendar;
use crate::config::LumenConfig;

/// Result of an open request.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    /// A window was created or focused.
    Opened { window_id: String },
    /// The target app is locked; answer the challenge with
    /// [`Session::submit_passcode`].
    ChallengeIssued(LockChallenge),
    /// The path was a package manifest and installation succeeded.
    Installed { app_id: String },
    /// The request failed; a notification describes why.
    Rejected,
}

/// One logged-in desktop.
pub struct Session {
    config: LumenConfig,
    clock: Box<dyn Clock>,
    broker: ProfileBroker,
    profile: ProfileSession,
    vfs: Vfs,
    wm: WindowManager,
    registry: AppRegistry,
    gate: AppLockGate,
    notifications: NotificationCenter,
    /// `date/event-id` keys already notified by the calendar scan.
    fired_events: HashSet<String>,
    warned_degraded: bool,
}

impl Session {
    /// Log an identity in: load its profile and build the desktop state.
    pub fn login(
        config: LumenConfig,
        clock: Box<dyn Clock>,
        mut broker: ProfileBroker,
        identity: Identity,
    ) -> Self {
        log::info!("login: {identity}");
        let outcome = broker.load(&identity);
        let mut notifications = NotificationCenter::new();
        if outcome.degraded {
            notifications.warning(
                "Storage unavailable",
                "Changes will not be saved beyond this session.",
            );
        }
        if outcome.created {
            notifications.info("Welcome", format!("Created a new profile for {identity}."));
        }
        let vfs = Vfs::from_snapshot(&outcome.profile.vfs).unwrap_or_else(|e| {
            log::warn!("stored VFS unreadable, starting empty: {e}");
            Vfs::new()
        });
        let registry = AppRegistry::from_profile(&outcome.profile);
        let wm = WindowManager::new(config.viewport());
        let gate = AppLockGate::new(config.unlock_ttl_secs.saturating_mul(1_000));
        let warned_degraded = outcome.degraded;
        Self {
            config,
            clock,
            broker,
            profile: ProfileSession::new(identity, outcome.profile),
            vfs,
            wm,
            registry,
            gate,
            notifications,
            fired_events: HashSet::new(),
            warned_degraded,
        }
    }

    /// Tear the session down, persisting final state. Returns the broker so
    /// the embedding can log the next identity in.
    pub fn logout(mut self) -> ProfileBroker {
        log::info!("logout: {}", self.profile.identity());
        self.persist();
        self.broker
    }

    // -- Accessors ----------------------------------------------------------

    pub fn config(&self) -> &LumenConfig {
        &self.config
    }

    pub fn identity(&self) -> &Identity {
        self.profile.identity()
    }

    pub fn profile(&self) -> &Profile {
        self.profile.profile()
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    pub fn windows(&self) -> &WindowManager {
        &self.wm
    }

    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn dismiss_notification(&mut self, id: u64) {
        self.notifications.dismiss(id);
    }

    /// The pending lock challenge, if one is outstanding.
    pub fn pending_challenge(&self) -> Option<&PendingOpen> {
        self.gate.pending()
    }

    // -- Profile updates ----------------------------------------------------

    /// Apply a patch to the live profile and persist at the new version.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> SaveStatus {
        let rebuild_registry = patch.external_apps.is_some()
            || patch.local_apps.is_some()
            || patch.shortcuts.is_some();
        self.profile.update(patch);
        if rebuild_registry {
            self.registry = AppRegistry::from_profile(self.profile.profile());
        }
        self.persist()
    }

    fn persist(&mut self) -> SaveStatus {
        let status = self.broker.save(
            self.profile.identity(),
            self.profile.profile(),
            self.profile.version(),
        );
        if status == SaveStatus::Degraded && !self.warned_degraded {
            self.warned_degraded = true;
            self.notifications.warning(
                "Storage unavailable",
                "Changes will not be saved beyond this session.",
            );
        }
        status
    }

    // -- VFS operations (each persists a fresh snapshot) --------------------

    pub fn create_node(
        &mut self,
        parent_path: &str,
        name: &str,
        payload: NodePayload,
    ) -> Result<NodeId> {
        let id = self.vfs.create(parent_path, name, payload)?;
        self.persist_vfs();
        Ok(id)
    }

    pub fn rename_node(&mut self, path: &str, new_name: &str) -> Result<()> {
        self.vfs.rename(path, new_name)?;
        self.persist_vfs();
        Ok(())
    }

    pub fn write_file(&mut self, path: &str, content: &str) -> Result<()> {
        self.vfs.update_content(path, content)?;
        self.persist_vfs();
        Ok(())
    }

    pub fn delete_node(&mut self, path: &str) -> Result<()> {
        self.vfs.delete(path)?;
        self.persist_vfs();
        Ok(())
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        Ok(self.vfs.read(path)?.to_string())
    }

    fn persist_vfs(&mut self) {
        let snapshot = self.vfs.snapshot();
        self.update_profile(ProfilePatch::vfs(snapshot));
    }

    // -- Launch pipeline ----------------------------------------------------

    /// Open an app, optionally with a file. The pipeline: app-lock gate,
    /// then file-association resolution, then window creation (or manifest
    /// installation). Failures notify and reject; they never panic.
    pub fn open_app(&mut self, app_id: &str, file_path: Option<&str>) -> OpenOutcome {
        let now = self.clock.now_ms();
        self.gate.expire(now);

        let locked = self
            .profile()
            .locked_apps
            .iter()
            .any(|id| id == app_id);
        if locked && !self.gate.is_unlocked(app_id, now) {
            let challenge = if self.profile().passcode_hash.is_some() {
                LockChallenge::EnterPasscode {
                    app_id: app_id.to_string(),
                }
            } else {
                LockChallenge::SetPasscode {
                    app_id: app_id.to_string(),
                }
            };
            self.gate.begin_challenge(PendingOpen {
                app_id: app_id.to_string(),
                file_path: file_path.map(String::from),
            });
            return OpenOutcome::ChallengeIssued(challenge);
        }

        if let Some(path) = file_path {
            if self.vfs.resolve(path).is_none() {
                self.notifications
                    .error("File not found", path.to_string());
                return OpenOutcome::Rejected;
            }
        }

        let target = match resolve_launch(&self.registry, app_id, file_path) {
            Ok(target) => target,
            Err(e) => {
                self.notifications.error("Cannot open", e.to_string());
                return OpenOutcome::Rejected;
            }
        };

        match target {
            LaunchTarget::InstallLocalApp { manifest_path } => self.install_from_vfs(&manifest_path),
            LaunchTarget::Window {
                descriptor,
                multi_instance,
            } => {
                let title = file_path
                    .and_then(|p| p.rsplit('/').next())
                    .map(str::to_string)
                    .unwrap_or_else(|| descriptor.title().to_string());
                let props = self.build_props(&descriptor, file_path);
                let request = OpenRequest {
                    app_id: descriptor.id().to_string(),
                    title,
                    default_size: descriptor.default_size(),
                    multi_instance,
                    props,
                };
                let window_id = self.wm.open(request);
                OpenOutcome::Opened { window_id }
            }
        }
    }

    fn install_from_vfs(&mut self, manifest_path: &str) -> OpenOutcome {
        let content = match self.vfs.read(manifest_path) {
            Ok(content) => content.to_string(),
            Err(e) => {
                self.notifications.error("Install failed", e.to_string());
                return OpenOutcome::Rejected;
            }
        };
        match install_manifest(&content, self.profile()) {
            Ok(manifest) => {
                let app_id = manifest.id.clone();
                let title = manifest.title.clone();
                let mut local_apps = self.profile().local_apps.clone();
                local_apps.push(manifest);
                self.update_profile(ProfilePatch {
                    local_apps: Some(local_apps),
                    ..ProfilePatch::default()
                });
                self.notifications
                    .info("App installed", format!("{title} is ready to launch."));
                OpenOutcome::Installed { app_id }
            }
            Err(e) => {
                self.notifications.error("Install failed", e.to_string());
                OpenOutcome::Rejected
            }
        }
    }

    /// The props object injected into the hosted app component.
    fn build_props(&self, descriptor: &AppDescriptor, file_path: Option<&str>) -> serde_json::Value {
        let mut props = serde_json::json!({
            "settings": self.profile().settings,
        });
        if let Some(path) = file_path {
            props["file_path"] = serde_json::Value::String(path.to_string());
        }
        match descriptor {
            AppDescriptor::External(app) => {
                props["url"] = serde_json::Value::String(app.url.clone());
            }
            AppDescriptor::Local(app) => {
                props["component_id"] = serde_json::Value::String(app.component_id.clone());
            }
            AppDescriptor::Shortcut(app) => {
                props["uri"] = serde_json::Value::String(app.uri.clone());
            }
            AppDescriptor::Builtin(_) => {}
        }
        props
    }

    // -- Passcode challenge -------------------------------------------------

    /// Answer the outstanding lock challenge. A correct (or newly set)
    /// passcode grants an unlocked session and re-runs the parked open; a
    /// wrong one re-issues the challenge.
    pub fn submit_passcode(&mut self, entry: &str) -> OpenOutcome {
        let Some(pending) = self.gate.take_pending() else {
            log::debug!("passcode submitted with no challenge outstanding");
            return OpenOutcome::Rejected;
        };
        let now = self.clock.now_ms();
        match self.profile().passcode_hash.clone() {
            None => {
                if entry.is_empty() {
                    self.notifications
                        .error("Passcode not set", "A passcode cannot be empty.");
                    self.gate.begin_challenge(pending.clone());
                    return OpenOutcome::ChallengeIssued(LockChallenge::SetPasscode {
                        app_id: pending.app_id,
                    });
                }
                self.update_profile(ProfilePatch {
                    passcode_hash: Some(Some(passcode::hash(entry))),
                    ..ProfilePatch::default()
                });
                self.gate.grant(&pending.app_id, now);
                self.open_app(&pending.app_id, pending.file_path.as_deref())
            }
            Some(stored) => {
                if passcode::verify(entry, &stored) {
                    self.gate.grant(&pending.app_id, now);
                    self.open_app(&pending.app_id, pending.file_path.as_deref())
                } else {
                    self.notifications
                        .error("Incorrect passcode", "Try again.");
                    self.gate.begin_challenge(pending.clone());
                    OpenOutcome::ChallengeIssued(LockChallenge::EnterPasscode {
                        app_id: pending.app_id,
                    })
                }
            }
        }
    }

    /// Abandon the outstanding challenge.
    pub fn cancel_challenge(&mut self) {
        self.gate.take_pending();
    }

    /// Add an app to the locked list.
    pub fn lock_app(&mut self, app_id: &str) {
        if self.profile().locked_apps.iter().any(|id| id == app_id) {
            return;
        }
        let mut locked = self.profile().locked_apps.clone();
        locked.push(app_id.to_string());
        self.update_profile(ProfilePatch {
            locked_apps: Some(locked),
            ..ProfilePatch::default()
        });
    }

    /// Remove an app from the locked list and revoke its unlock session.
    pub fn unlock_app(&mut self, app_id: &str) {
        self.gate.revoke(app_id);
        if !self.profile().locked_apps.iter().any(|id| id == app_id) {
            return;
        }
        let locked = self
            .profile()
            .locked_apps
            .iter()
            .filter(|id| id.as_str() != app_id)
            .cloned()
            .collect();
        self.update_profile(ProfilePatch {
            locked_apps: Some(locked),
            ..ProfilePatch::default()
        });
    }

    // -- Window pass-throughs ----------------------------------------------

    pub fn focus_window(&mut self, id: &str) {
        self.wm.focus(id);
    }

    pub fn minimize_window(&mut self, id: &str) {
        self.wm.minimize(id);
    }

    pub fn toggle_maximize_window(&mut self, id: &str) {
        self.wm.toggle_maximize(id);
    }

    pub fn close_window(&mut self, id: &str) {
        self.wm.close(id);
    }

    // -- Shell views --------------------------------------------------------

    pub fn dock(&self) -> Vec<DockItem> {
        dock_items(&self.registry, self.profile(), &self.wm)
    }

    pub fn spotlight(&self, query: &str, limit: usize) -> Vec<SpotlightHit> {
        spotlight::search(&self.registry, &self.vfs, query, limit)
    }

    pub fn mission_control(&self) -> Vec<&WindowRecord> {
        self.wm.by_z_desc()
    }

    // -- Periodic work ------------------------------------------------------

    /// Minute-granularity tick: expire unlock sessions and fire one
    /// notification per newly-due calendar event.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.gate.expire(now);
        let today = calendar::date_string(now);
        let due: Vec<(String, String, Option<String>)> =
            calendar::due_events(&self.profile().calendar_events, now)
                .into_iter()
                .map(|e| (e.id.clone(), e.title.clone(), e.time.clone()))
                .collect();
        for (id, title, time) in due {
            let key = format!("{today}/{id}");
            if self.fired_events.insert(key) {
                let body = match time {
                    Some(time) => format!("Today at {time}"),
                    None => "Today".to_string(),
                };
                self.notifications.push(
                    lumen_shell::NotificationKind::Info,
                    title,
                    body,
                );
            }
        }
    }

    // -- Identity transitions -----------------------------------------------

    /// Promote the current guest session to a named account, carrying the
    /// guest profile over. The only sanctioned cross-identity copy.
    pub fn promote_guest(&mut self, name: &str) -> bool {
        if *self.profile.identity() != Identity::Guest {
            self.notifications.error(
                "Cannot create account",
                "Only a guest session can be promoted.",
            );
            return false;
        }
        if name.is_empty() || name == "admin" {
            self.notifications
                .error("Cannot create account", format!("Invalid name: {name:?}"));
            return false;
        }
        let identity = Identity::Named(name.to_string());
        let profile = self.profile.profile().clone();
        self.profile = ProfileSession::new(identity, profile);
        // Bump the version so the save is fresh for the new identity.
        self.profile.update(ProfilePatch::default());
        let status = self.persist();
        self.broker.clear_guest();
        log::info!("promoted guest to {name} ({status:?})");
        self.notifications
            .info("Account created", format!("You are now signed in as {name}."));
        true
    }
}
