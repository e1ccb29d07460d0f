//! Notification queue
//!
//! Holds the ephemeral messages produced by qualifying status transitions.
//! Each entry expires on its own clock, so two completions landing inside
//! one display window both get shown instead of the second overwriting the
//! first.

use std::collections::VecDeque;
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::snapshot::diff::StatusTransition;

/// Default time a notification stays visible
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// An ephemeral, auto-expiring user-facing message
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn from_transition(transition: &StatusTransition, now: DateTime<Utc>) -> Option<Self> {
        use crate::models::deployment::DeploymentStatus;

        let (message, kind) = match transition.to {
            DeploymentStatus::Running => (
                format!("{} deployed successfully", transition.name),
                NotificationKind::Success,
            ),
            DeploymentStatus::Failed => (
                format!("{} deployment failed", transition.name),
                NotificationKind::Error,
            ),
            _ => return None,
        };

        Some(Self {
            id: Uuid::new_v4().to_string(),
            message,
            kind,
            created_at: now,
        })
    }
}

/// Ordered queue of live notifications with per-entry expiry.
///
/// The clock is always passed in by the caller so tests can fast-forward
/// time instead of sleeping.
pub struct NotificationQueue {
    ttl: chrono::Duration,
    entries: RwLock<VecDeque<Notification>>,
}

impl NotificationQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            // ttl comes from settings and fits i64 milliseconds comfortably
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::seconds(5)),
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Queue a notification for a qualifying transition. Non-notifiable
    /// transitions are ignored. Returns whether an entry was queued.
    pub fn push(&self, transition: &StatusTransition, now: DateTime<Utc>) -> bool {
        let Some(notification) = Notification::from_transition(transition, now) else {
            return false;
        };
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.push_back(notification);
        true
    }

    /// Unexpired notifications, oldest first
    pub fn live(&self, now: DateTime<Utc>) -> Vec<Notification> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .filter(|n| now - n.created_at < self.ttl)
            .cloned()
            .collect()
    }

    /// Drop expired entries
    pub fn prune(&self, now: DateTime<Utc>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|n| now - n.created_at < self.ttl);
    }

    /// Discard everything (teardown)
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
