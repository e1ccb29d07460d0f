//! Notification queue unit tests

use std::time::Duration;

use chrono::{TimeZone, Utc};
use zippwatch::models::deployment::DeploymentStatus;
use zippwatch::notify::queue::{NotificationKind, NotificationQueue};
use zippwatch::snapshot::diff::StatusTransition;

fn transition(name: &str, to: DeploymentStatus) -> StatusTransition {
    StatusTransition {
        id: format!("id-{}", name),
        name: name.to_string(),
        from: DeploymentStatus::Building,
        to,
    }
}

#[test]
fn test_success_and_failure_messages() {
    let queue = NotificationQueue::new(Duration::from_secs(5));
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

    assert!(queue.push(&transition("portfolio", DeploymentStatus::Running), now));
    assert!(queue.push(&transition("landing", DeploymentStatus::Failed), now));

    let live = queue.live(now);
    assert_eq!(live.len(), 2);
    assert_eq!(live[0].message, "portfolio deployed successfully");
    assert_eq!(live[0].kind, NotificationKind::Success);
    assert_eq!(live[1].message, "landing deployment failed");
    assert_eq!(live[1].kind, NotificationKind::Error);
}

#[test]
fn test_non_qualifying_transition_ignored() {
    let queue = NotificationQueue::new(Duration::from_secs(5));
    let now = Utc::now();

    assert!(!queue.push(&transition("site", DeploymentStatus::Building), now));
    assert!(!queue.push(&transition("site", DeploymentStatus::Stopped), now));
    assert!(queue.is_empty());
}

#[test]
fn test_each_entry_expires_independently() {
    let queue = NotificationQueue::new(Duration::from_secs(5));
    let t0 = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
    let t3 = t0 + chrono::Duration::seconds(3);

    // Two events inside one display window both stay visible
    queue.push(&transition("first", DeploymentStatus::Running), t0);
    queue.push(&transition("second", DeploymentStatus::Running), t3);
    assert_eq!(queue.live(t3).len(), 2);

    // At t0+6 the first has expired, the second has not
    let t6 = t0 + chrono::Duration::seconds(6);
    let live = queue.live(t6);
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].message, "second deployed successfully");

    // At t3+6 everything is gone
    let t9 = t0 + chrono::Duration::seconds(9);
    assert!(queue.live(t9).is_empty());
}

#[test]
fn test_prune_drops_expired_entries() {
    let queue = NotificationQueue::new(Duration::from_secs(5));
    let t0 = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

    queue.push(&transition("old", DeploymentStatus::Running), t0);
    assert_eq!(queue.len(), 1);

    queue.prune(t0 + chrono::Duration::seconds(10));
    assert!(queue.is_empty());
}

#[test]
fn test_clear_on_teardown() {
    let queue = NotificationQueue::new(Duration::from_secs(5));
    let now = Utc::now();

    queue.push(&transition("site", DeploymentStatus::Running), now);
    queue.clear();
    assert!(queue.live(now).is_empty());
}
