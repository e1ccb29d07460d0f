//! Snapshot store unit tests

use chrono::Utc;
use zippwatch::models::deployment::{Deployment, DeploymentStatus, DeploymentType};
use zippwatch::snapshot::store::SnapshotStore;

fn create_test_deployment(id: &str, status: DeploymentStatus) -> Deployment {
    Deployment {
        id: id.to_string(),
        name: format!("app-{}", id),
        description: None,
        deployment_type: DeploymentType::Git,
        status,
        repo_url: Some("https://github.com/acme/site".to_string()),
        branch: Some("main".to_string()),
        public_url: None,
        created_at: Some(Utc::now()),
        updated_at: Some(Utc::now()),
    }
}

#[test]
fn test_first_replace_yields_no_transitions() {
    let store = SnapshotStore::new();
    let transitions = store.replace(
        vec![create_test_deployment("1", DeploymentStatus::Running)],
        Utc::now(),
    );

    assert!(transitions.is_empty());
    assert_eq!(store.current().unwrap().len(), 1);
    assert!(store.previous().is_none());
}

#[test]
fn test_replace_reports_status_transitions() {
    let store = SnapshotStore::new();
    store.replace(
        vec![create_test_deployment("1", DeploymentStatus::Building)],
        Utc::now(),
    );
    let transitions = store.replace(
        vec![create_test_deployment("1", DeploymentStatus::Running)],
        Utc::now(),
    );

    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].from, DeploymentStatus::Building);
    assert_eq!(transitions[0].to, DeploymentStatus::Running);
}

#[test]
fn test_only_one_prior_generation_retained() {
    let store = SnapshotStore::new();
    store.replace(vec![create_test_deployment("1", DeploymentStatus::Pending)], Utc::now());
    store.replace(vec![create_test_deployment("1", DeploymentStatus::Building)], Utc::now());
    store.replace(vec![create_test_deployment("1", DeploymentStatus::Running)], Utc::now());

    let previous = store.previous().unwrap();
    let current = store.current().unwrap();
    assert_eq!(previous.get("1").unwrap().status, DeploymentStatus::Building);
    assert_eq!(current.get("1").unwrap().status, DeploymentStatus::Running);
}

#[test]
fn test_empty_list_is_a_valid_snapshot() {
    let store = SnapshotStore::new();
    store.replace(
        vec![create_test_deployment("1", DeploymentStatus::Running)],
        Utc::now(),
    );
    let transitions = store.replace(vec![], Utc::now());

    // Disappeared records have no deletion semantics, hence no transitions
    assert!(transitions.is_empty());
    assert!(store.current().unwrap().is_empty());
}

#[test]
fn test_has_active() {
    let store = SnapshotStore::new();
    store.replace(
        vec![
            create_test_deployment("1", DeploymentStatus::Running),
            create_test_deployment("2", DeploymentStatus::Building),
        ],
        Utc::now(),
    );
    assert!(store.current().unwrap().has_active());

    store.replace(
        vec![create_test_deployment("1", DeploymentStatus::Running)],
        Utc::now(),
    );
    assert!(!store.current().unwrap().has_active());
}
