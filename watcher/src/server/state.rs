//! Server state

use std::sync::Arc;

use tokio::sync::Notify;

use crate::notify::queue::NotificationQueue;
use crate::snapshot::store::SnapshotStore;
use crate::sync::watcher::Watcher;

/// Server state shared across handlers
pub struct ServerState {
    pub store: Arc<SnapshotStore>,
    pub notifications: Arc<NotificationQueue>,
    pub watcher: Arc<Watcher>,
    pub poll_trigger: Arc<Notify>,
}

impl ServerState {
    pub fn new(
        store: Arc<SnapshotStore>,
        notifications: Arc<NotificationQueue>,
        watcher: Arc<Watcher>,
        poll_trigger: Arc<Notify>,
    ) -> Self {
        Self {
            store,
            notifications,
            watcher,
            poll_trigger,
        }
    }
}
