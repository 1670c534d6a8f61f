//! App-lock gate.
//!
//! Opening a locked app issues a passcode challenge instead of a window.
//! A correct passcode grants an unlocked session for that app id with an
//! explicit expiry; the gate consults the unlocked set before the persisted
//! lock list, so re-entry after a successful challenge needs no mutation of
//! shared state.

use std::collections::HashMap;

use lumen_types::clock::TimestampMs;

/// The prompt to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockChallenge {
    /// The app is locked but no passcode exists yet: ask to set one.
    SetPasscode { app_id: String },
    /// Ask for the existing passcode.
    EnterPasscode { app_id: String },
}

impl LockChallenge {
    pub fn app_id(&self) -> &str {
        match self {
            Self::SetPasscode { app_id } | Self::EnterPasscode { app_id } => app_id,
        }
    }
}

/// The open request parked while its challenge is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOpen {
    pub app_id: String,
    pub file_path: Option<String>,
}

/// Unlocked-session bookkeeping plus the parked open request.
#[derive(Debug)]
pub struct AppLockGate {
    ttl_ms: u64,
    /// App id -> unlock expiry.
    unlocked: HashMap<String, TimestampMs>,
    pending: Option<PendingOpen>,
}

impl AppLockGate {
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl_ms,
            unlocked: HashMap::new(),
            pending: None,
        }
    }

    /// Whether an unlocked session for this app is still live.
    pub fn is_unlocked(&self, app_id: &str, now: TimestampMs) -> bool {
        self.unlocked
            .get(app_id)
            .is_some_and(|expiry| *expiry > now)
    }

    /// Record a successful challenge.
    pub fn grant(&mut self, app_id: &str, now: TimestampMs) {
        log::debug!("unlock session for {app_id}");
        self.unlocked.insert(app_id.to_string(), now + self.ttl_ms);
    }

    /// Drop an app's unlocked session (re-locking).
    pub fn revoke(&mut self, app_id: &str) {
        self.unlocked.remove(app_id);
    }

    /// Drop every expired unlock.
    pub fn expire(&mut self, now: TimestampMs) {
        self.unlocked.retain(|_, expiry| *expiry > now);
    }

    /// Park an open request behind a challenge (replacing any previous one).
    pub fn begin_challenge(&mut self, pending: PendingOpen) {
        self.pending = Some(pending);
    }

    /// Take the parked request, if any.
    pub fn take_pending(&mut self) -> Option<PendingOpen> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingOpen> {
        self.pending.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_gate_is_locked() {
        let gate = AppLockGate::new(1_000);
        assert!(!gate.is_unlocked("terminal", 0));
    }

    #[test]
    fn grant_unlocks_until_ttl() {
        let mut gate = AppLockGate::new(1_000);
        gate.grant("terminal", 5_000);
        assert!(gate.is_unlocked("terminal", 5_999));
        assert!(!gate.is_unlocked("terminal", 6_000));
    }

    #[test]
    fn grants_are_per_app() {
        let mut gate = AppLockGate::new(1_000);
        gate.grant("terminal", 0);
        assert!(!gate.is_unlocked("chat", 1));
    }

    #[test]
    fn revoke_relocks() {
        let mut gate = AppLockGate::new(1_000);
        gate.grant("terminal", 0);
        gate.revoke("terminal");
        assert!(!gate.is_unlocked("terminal", 1));
    }

    #[test]
    fn expire_drops_only_stale_entries() {
        let mut gate = AppLockGate::new(1_000);
        gate.grant("terminal", 0);
        gate.grant("chat", 500);
        gate.expire(1_200);
        assert!(!gate.is_unlocked("terminal", 1_200));
        assert!(gate.is_unlocked("chat", 1_200));
    }

    #[test]
    fn pending_roundtrip() {
        let mut gate = AppLockGate::new(1_000);
        assert!(gate.take_pending().is_none());
        gate.begin_challenge(PendingOpen {
            app_id: "terminal".to_string(),
            file_path: None,
        });
        assert_eq!(gate.pending().unwrap().app_id, "terminal");
        let pending = gate.take_pending().unwrap();
        assert_eq!(pending.app_id, "terminal");
        assert!(gate.take_pending().is_none());
    }

    #[test]
    fn challenge_variants_expose_app_id() {
        let set = LockChallenge::SetPasscode {
            app_id: "a".to_string(),
        };
        let enter = LockChallenge::EnterPasscode {
            app_id: "b".to_string(),
        };
        assert_eq!(set.app_id(), "a");
        assert_eq!(enter.app_id(), "b");
    }
}
