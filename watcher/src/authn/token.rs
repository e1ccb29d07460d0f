//! Bearer token retrieval
//!
//! Token issuance lives outside the watcher; all the poll loop needs is an
//! opaque bearer string per request, fetched through this seam.

use async_trait::async_trait;

use crate::errors::WatchError;

/// Token provider trait for testability
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a bearer token for the next backend request
    async fn bearer_token(&self) -> Result<String, WatchError>;
}

/// Token provider backed by a fixed string from settings or environment
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, WatchError> {
        if self.token.is_empty() {
            return Err(WatchError::TokenError("empty bearer token".to_string()));
        }
        Ok(self.token.clone())
    }
}
