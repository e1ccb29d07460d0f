//! Watcher poll loop unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use zippwatch::authn::token::TokenProvider;
use zippwatch::errors::WatchError;
use zippwatch::http::deployments::DeploymentsApi;
use zippwatch::models::deployment::{Deployment, DeploymentStatus, DeploymentType};
use zippwatch::notify::queue::NotificationQueue;
use zippwatch::snapshot::store::SnapshotStore;
use zippwatch::sync::watcher::{PollOutcome, Watcher};

fn create_test_deployment(id: &str, status: DeploymentStatus) -> Deployment {
    Deployment {
        id: id.to_string(),
        name: format!("app-{}", id),
        description: None,
        deployment_type: DeploymentType::Git,
        status,
        repo_url: None,
        branch: None,
        public_url: None,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

/// Scripted backend: returns queued responses in order, then repeats the
/// last one. Counts how many fetches actually happened.
struct ScriptedApi {
    responses: Mutex<Vec<Result<Vec<Deployment>, String>>>,
    calls: AtomicUsize,
}

impl ScriptedApi {
    fn new(responses: Vec<Result<Vec<Deployment>, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeploymentsApi for ScriptedApi {
    async fn list_deployments(&self, _token: &str) -> Result<Vec<Deployment>, WatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        let next = if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses[0].clone()
        };
        next.map_err(WatchError::BackendError)
    }
}

struct TestTokenProvider;

#[async_trait]
impl TokenProvider for TestTokenProvider {
    async fn bearer_token(&self) -> Result<String, WatchError> {
        Ok("test-token".to_string())
    }
}

fn build_watcher(api: Arc<ScriptedApi>) -> Watcher {
    Watcher::new(
        api,
        Arc::new(TestTokenProvider),
        Arc::new(SnapshotStore::new()),
        Arc::new(NotificationQueue::new(Duration::from_secs(5))),
    )
}

#[tokio::test]
async fn test_gate_closes_without_active_deployments() {
    let api = Arc::new(ScriptedApi::new(vec![Ok(vec![
        create_test_deployment("1", DeploymentStatus::Running),
    ])]));
    let watcher = build_watcher(api.clone());

    // First tick always fetches
    let outcome = watcher.poll_once().await.unwrap();
    assert!(matches!(outcome, PollOutcome::Synced { .. }));
    assert_eq!(api.calls(), 1);

    // No active records: subsequent ticks stay off the network
    assert_eq!(watcher.poll_once().await.unwrap(), PollOutcome::Skipped);
    assert_eq!(watcher.poll_once().await.unwrap(), PollOutcome::Skipped);
    assert_eq!(api.calls(), 1);

    // A forced poll bypasses the gate
    watcher.force_poll().await.unwrap();
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn test_gate_stays_open_while_deployments_are_active() {
    let api = Arc::new(ScriptedApi::new(vec![
        Ok(vec![create_test_deployment("1", DeploymentStatus::Building)]),
        Ok(vec![create_test_deployment("1", DeploymentStatus::Building)]),
        Ok(vec![create_test_deployment("1", DeploymentStatus::Running)]),
    ]));
    let watcher = build_watcher(api.clone());

    watcher.poll_once().await.unwrap();
    watcher.poll_once().await.unwrap();
    watcher.poll_once().await.unwrap();
    assert_eq!(api.calls(), 3);

    // The last poll saw only a running record, so the gate closes now
    assert_eq!(watcher.poll_once().await.unwrap(), PollOutcome::Skipped);
    assert_eq!(api.calls(), 3);
}

#[tokio::test]
async fn test_transition_produces_one_notification() {
    let api = Arc::new(ScriptedApi::new(vec![
        Ok(vec![create_test_deployment("1", DeploymentStatus::Building)]),
        Ok(vec![create_test_deployment("1", DeploymentStatus::Running)]),
    ]));
    let watcher = build_watcher(api.clone());

    watcher.poll_once().await.unwrap();
    let outcome = watcher.poll_once().await.unwrap();
    assert_eq!(
        outcome,
        PollOutcome::Synced {
            transitions: 1,
            notified: 1
        }
    );

    let live = watcher.notifications().live(Utc::now());
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].message, "app-1 deployed successfully");
}

#[tokio::test]
async fn test_intermediate_transition_counts_but_does_not_notify() {
    let api = Arc::new(ScriptedApi::new(vec![
        Ok(vec![create_test_deployment("1", DeploymentStatus::Pending)]),
        Ok(vec![create_test_deployment("1", DeploymentStatus::Building)]),
    ]));
    let watcher = build_watcher(api.clone());

    watcher.poll_once().await.unwrap();
    let outcome = watcher.poll_once().await.unwrap();
    assert_eq!(
        outcome,
        PollOutcome::Synced {
            transitions: 1,
            notified: 0
        }
    );
    assert!(watcher.notifications().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_leaves_snapshot_unchanged() {
    let api = Arc::new(ScriptedApi::new(vec![
        Ok(vec![create_test_deployment("1", DeploymentStatus::Building)]),
        Err("502 Bad Gateway".to_string()),
        Ok(vec![create_test_deployment("1", DeploymentStatus::Running)]),
    ]));
    let watcher = build_watcher(api.clone());

    watcher.poll_once().await.unwrap();
    assert!(watcher.poll_once().await.is_err());

    // Snapshot still shows the last good fetch, and the error is recorded
    let current = watcher.store().current().unwrap();
    assert_eq!(current.get("1").unwrap().status, DeploymentStatus::Building);
    assert_eq!(watcher.state().await.err_streak, 1);

    // Next successful tick recovers and still sees the transition
    let outcome = watcher.poll_once().await.unwrap();
    assert_eq!(
        outcome,
        PollOutcome::Synced {
            transitions: 1,
            notified: 1
        }
    );
    assert_eq!(watcher.state().await.err_streak, 0);
}
