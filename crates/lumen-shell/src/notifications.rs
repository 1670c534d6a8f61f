//! Notification center.
//!
//! Every failure path in the core terminates here or in a logged no-op:
//! not-found, collisions, rejected installs, degraded storage. Apps also
//! push their own notices through the same feed.

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

/// One entry in the notification feed.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

/// The notification feed: newest last, dismissable by id.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a notification and return its id.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let notification = Notification {
            id,
            kind,
            title: title.into(),
            body: body.into(),
        };
        match kind {
            NotificationKind::Info => log::info!("{}: {}", notification.title, notification.body),
            NotificationKind::Warning => {
                log::warn!("{}: {}", notification.title, notification.body);
            }
            NotificationKind::Error => {
                log::warn!("{}: {}", notification.title, notification.body);
            }
        }
        self.items.push(notification);
        id
    }

    pub fn info(&mut self, title: impl Into<String>, body: impl Into<String>) -> u64 {
        self.push(NotificationKind::Info, title, body)
    }

    pub fn warning(&mut self, title: impl Into<String>, body: impl Into<String>) -> u64 {
        self.push(NotificationKind::Warning, title, body)
    }

    pub fn error(&mut self, title: impl Into<String>, body: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, title, body)
    }

    /// All notifications, oldest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Remove one notification. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    /// Clear the feed.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
