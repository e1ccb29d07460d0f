//! Snapshot diffing

use crate::models::deployment::DeploymentStatus;
use crate::snapshot::store::Snapshot;

/// A change in one record's status between two consecutive snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub id: String,
    pub name: String,
    pub from: DeploymentStatus,
    pub to: DeploymentStatus,
}

impl StatusTransition {
    /// Transitions worth telling the user about: a deployment finished
    /// serving or failed. Everything else (pending -> building etc.) is
    /// reported to callers but not notified.
    pub fn is_notifiable(&self) -> bool {
        matches!(
            self.to,
            DeploymentStatus::Running | DeploymentStatus::Failed
        )
    }
}

/// Compare two snapshots by record identity.
///
/// For every record in `current` that also exists in `previous` with a
/// different status, emit one transition, in `current` order. Records new
/// to `current` have no prior state to transition from; records gone from
/// `current` have no deletion semantics here. Pure function of its inputs.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> Vec<StatusTransition> {
    let mut transitions = Vec::new();
    for record in current.records() {
        if let Some(prior) = previous.get(&record.id) {
            if prior.status != record.status {
                transitions.push(StatusTransition {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    from: prior.status,
                    to: record.status,
                });
            }
        }
    }
    transitions
}
