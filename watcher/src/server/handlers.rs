//! HTTP request handlers

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::summary::{summarize, AnalyticsSummary};
use crate::models::deployment::Deployment;
use crate::notify::queue::Notification;
use crate::server::state::ServerState;
use crate::utils::version_info;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "zippwatch".to_string(),
        version: version.version,
    })
}

/// Version response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
    })
}

/// Deployments response
#[derive(Debug, Serialize)]
pub struct DeploymentsResponse {
    pub deployments: Vec<Deployment>,
    pub total: usize,
    pub taken_at: Option<DateTime<Utc>>,
}

/// Current snapshot handler
pub async fn deployments_handler(
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let (deployments, taken_at) = match state.store.current() {
        Some(snapshot) => (snapshot.records().to_vec(), Some(snapshot.taken_at())),
        None => (Vec::new(), None),
    };
    let total = deployments.len();

    Json(DeploymentsResponse {
        deployments,
        total,
        taken_at,
    })
}

/// Analytics response
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub summary: AnalyticsSummary,
    pub success_rate_percent: u32,
}

/// Analytics handler, computed on demand from the current snapshot
pub async fn analytics_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let summary = match state.store.current() {
        Some(snapshot) => summarize(snapshot.records()),
        None => summarize(&[]),
    };
    let success_rate_percent = summary.success_rate_percent();

    Json(AnalyticsResponse {
        summary,
        success_rate_percent,
    })
}

/// Notifications response
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

/// Live notifications handler
pub async fn notifications_handler(
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let now = Utc::now();
    state.notifications.prune(now);

    Json(NotificationsResponse {
        notifications: state.notifications.live(now),
    })
}

/// Watcher status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub has_synced: bool,
    pub watch_active: bool,
    pub last_attempted_at: DateTime<Utc>,
    pub last_synced_at: DateTime<Utc>,
    pub err_streak: u32,
}

/// Watcher status handler
pub async fn status_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let watch = state.watcher.state().await;

    Json(StatusResponse {
        has_synced: watch.has_synced,
        watch_active: watch.watch_active,
        last_attempted_at: watch.last_attempted_at,
        last_synced_at: watch.last_synced_at,
        err_streak: watch.err_streak,
    })
}

/// Poll trigger response
#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub triggered: bool,
}

/// Wake the poller for an immediate ungated poll. Used by the dashboard
/// right after submitting a new deployment, when the gate may be closed.
pub async fn poll_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.poll_trigger.notify_one();
    Json(PollResponse { triggered: true })
}
