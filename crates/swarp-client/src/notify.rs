use std::collections::VecDeque;

/// Maximum number of simultaneously visible notifications.
pub const MAX_VISIBLE_NOTIFICATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = match self.severity {
            Severity::Info => "→",
            Severity::Error => "✗",
        };
        write!(f, "{marker} {}: {}", self.title, self.description)
    }
}

/// Queue managing notification display.
pub struct NotificationQueue {
    visible: Vec<Notification>,
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self {
            visible: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Add a new notification to the queue.
    pub fn push(&mut self, notification: Notification) {
        if self.visible.len() < MAX_VISIBLE_NOTIFICATIONS {
            self.visible.push(notification);
        } else {
            self.pending.push_back(notification);
        }
    }

    /// Get currently visible notifications.
    pub fn visible(&self) -> &[Notification] {
        &self.visible
    }

    /// Dismiss the oldest visible notification and promote a pending one.
    pub fn dismiss_oldest(&mut self) -> Option<Notification> {
        if self.visible.is_empty() {
            return None;
        }
        let dismissed = self.visible.remove(0);
        if let Some(next) = self.pending.pop_front() {
            self.visible.push(next);
        }
        Some(dismissed)
    }

    /// Take everything, visible first, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut all = std::mem::take(&mut self.visible);
        all.extend(self.pending.drain(..));
        all
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.pending.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}
