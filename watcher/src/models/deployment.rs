//! Deployment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a deployment was submitted to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentType {
    Git,
    Zip,
}

/// Backend-owned deployment status.
///
/// Closed set on purpose: a new backend status value must be added here
/// explicitly so every `match` over statuses is checked at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Building,
    Running,
    Failed,
    Stopped,
}

impl DeploymentStatus {
    /// Statuses that still expect backend-side progress
    pub fn is_active(&self) -> bool {
        matches!(self, DeploymentStatus::Pending | DeploymentStatus::Building)
    }

    /// Wire/display representation, matching the serde rename
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Building => "building",
            DeploymentStatus::Running => "running",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Stopped => "stopped",
        }
    }

    /// All statuses, in a stable order used for aggregation output
    pub fn all() -> [DeploymentStatus; 5] {
        [
            DeploymentStatus::Pending,
            DeploymentStatus::Building,
            DeploymentStatus::Running,
            DeploymentStatus::Failed,
            DeploymentStatus::Stopped,
        ]
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployment record as reported by the backend.
///
/// The backend is the sole authority for these fields; the watcher only
/// replaces whole records with freshly fetched ones, never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    /// Unique, stable deployment ID
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// How the deployment was submitted
    pub deployment_type: DeploymentType,

    /// Current status
    pub status: DeploymentStatus,

    /// Source repository URL (git deployments)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,

    /// Source branch (git deployments)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Public URL once the deployment is serving
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,

    /// Creation timestamp (invariant: updated_at >= created_at)
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
