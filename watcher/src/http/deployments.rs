//! Deployment list API client

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::errors::WatchError;
use crate::http::client::HttpClient;
use crate::models::deployment::Deployment;

/// List of deployments response.
///
/// A body without a `deployments` field decodes as an empty list; records
/// that fail to parse (e.g. a status value this build does not know) are
/// dropped individually so one bad record cannot lose a whole tick.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentListResponse {
    #[serde(default, deserialize_with = "lenient_records")]
    pub deployments: Vec<Deployment>,
}

fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<Deployment>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    let mut records = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<Deployment>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Dropping unparseable deployment record: {}", e);
            }
        }
    }
    Ok(records)
}

/// Fetch seam for the poll loop, so tests can substitute a scripted backend
#[async_trait]
pub trait DeploymentsApi: Send + Sync {
    /// Get the full current deployment list for the authenticated user
    async fn list_deployments(&self, token: &str) -> Result<Vec<Deployment>, WatchError>;
}

#[async_trait]
impl DeploymentsApi for HttpClient {
    async fn list_deployments(&self, token: &str) -> Result<Vec<Deployment>, WatchError> {
        let response: DeploymentListResponse = self.get("/api/deployments/", token).await?;
        Ok(response.deployments)
    }
}
