//! Deployment watcher
//!
//! Owns one poll tick end to end: gate check, token retrieval, fetch,
//! snapshot replacement, transition notifications. The poll worker drives
//! it on a timer; the server layer can force an ungated poll.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::authn::token::TokenProvider;
use crate::errors::WatchError;
use crate::http::deployments::DeploymentsApi;
use crate::notify::queue::NotificationQueue;
use crate::snapshot::store::SnapshotStore;

/// Watch state, updated only as an output of each tick.
///
/// `watch_active` is the poll gate: once a fetch has succeeded and the
/// snapshot holds no pending/building record, timer ticks stop reaching
/// the network until something forces a poll.
#[derive(Debug, Clone)]
pub struct WatchState {
    pub has_synced: bool,
    pub watch_active: bool,
    pub last_attempted_at: DateTime<Utc>,
    pub last_synced_at: DateTime<Utc>,
    pub err_streak: u32,
}

impl Default for WatchState {
    fn default() -> Self {
        Self {
            has_synced: false,
            watch_active: false,
            last_attempted_at: DateTime::<Utc>::MIN_UTC,
            last_synced_at: DateTime::<Utc>::MIN_UTC,
            err_streak: 0,
        }
    }
}

/// Outcome of one poll tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Gate closed: no active deployments, nothing fetched
    Skipped,
    /// Fetch succeeded; counts of transitions seen and notifications queued
    Synced {
        transitions: usize,
        notified: usize,
    },
}

/// Deployment watcher
pub struct Watcher {
    api: Arc<dyn DeploymentsApi>,
    token_provider: Arc<dyn TokenProvider>,
    store: Arc<SnapshotStore>,
    notifications: Arc<NotificationQueue>,
    state: RwLock<WatchState>,
}

impl Watcher {
    pub fn new(
        api: Arc<dyn DeploymentsApi>,
        token_provider: Arc<dyn TokenProvider>,
        store: Arc<SnapshotStore>,
        notifications: Arc<NotificationQueue>,
    ) -> Self {
        Self {
            api,
            token_provider,
            store,
            notifications,
            state: RwLock::new(WatchState::default()),
        }
    }

    /// One gated poll tick. Skips the network entirely when the last
    /// snapshot had no active deployments.
    pub async fn poll_once(&self) -> Result<PollOutcome, WatchError> {
        {
            let state = self.state.read().await;
            if state.has_synced && !state.watch_active {
                debug!("No active deployments, skipping poll");
                return Ok(PollOutcome::Skipped);
            }
        }
        self.poll_impl().await
    }

    /// Poll regardless of the gate (wake triggers, first run)
    pub async fn force_poll(&self) -> Result<PollOutcome, WatchError> {
        self.poll_impl().await
    }

    async fn poll_impl(&self) -> Result<PollOutcome, WatchError> {
        {
            let mut state = self.state.write().await;
            state.last_attempted_at = Utc::now();
        }

        match self.fetch_and_apply().await {
            Ok(outcome) => {
                let mut state = self.state.write().await;
                state.last_synced_at = Utc::now();
                state.err_streak = 0;
                Ok(outcome)
            }
            Err(e) => {
                // Snapshot is left untouched; the next tick retries on
                // schedule with no user-facing error.
                let mut state = self.state.write().await;
                state.err_streak += 1;
                warn!("Poll failed (streak {}): {}", state.err_streak, e);
                Err(e)
            }
        }
    }

    async fn fetch_and_apply(&self) -> Result<PollOutcome, WatchError> {
        let token = self.token_provider.bearer_token().await?;
        let records = self.api.list_deployments(&token).await?;

        let now = Utc::now();
        let still_active = records.iter().any(|r| r.status.is_active());
        let transitions = self.store.replace(records, now);

        let mut notified = 0;
        for transition in &transitions {
            if self.notifications.push(transition, now) {
                info!(
                    "Deployment {} went {} -> {}",
                    transition.name, transition.from, transition.to
                );
                notified += 1;
            }
        }
        self.notifications.prune(now);

        {
            let mut state = self.state.write().await;
            state.has_synced = true;
            state.watch_active = still_active;
        }

        debug!(
            "Poll applied: {} transitions, {} notified, active={}",
            transitions.len(),
            notified,
            still_active
        );

        Ok(PollOutcome::Synced {
            transitions: transitions.len(),
            notified,
        })
    }

    /// Current watch state
    pub async fn state(&self) -> WatchState {
        self.state.read().await.clone()
    }

    /// Snapshot store this watcher writes to
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Notification queue this watcher feeds
    pub fn notifications(&self) -> &Arc<NotificationQueue> {
        &self.notifications
    }
}
