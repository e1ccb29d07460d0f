//! Application state management

use std::sync::Arc;

use tokio::sync::Notify;
use tracing::info;

use crate::app::options::AppOptions;
use crate::authn::token::{StaticTokenProvider, TokenProvider};
use crate::errors::WatchError;
use crate::http::client::HttpClient;
use crate::notify::queue::NotificationQueue;
use crate::snapshot::store::SnapshotStore;
use crate::sync::watcher::Watcher;

/// Main application state
pub struct AppState {
    /// HTTP client for backend communication
    pub http_client: Arc<HttpClient>,

    /// Token provider for authentication
    pub token_provider: Arc<dyn TokenProvider>,

    /// Two-generation snapshot store
    pub store: Arc<SnapshotStore>,

    /// Live notification queue
    pub notifications: Arc<NotificationQueue>,

    /// Deployment watcher
    pub watcher: Arc<Watcher>,

    /// Wake handle for forcing an ungated poll
    pub poll_trigger: Arc<Notify>,
}

impl AppState {
    /// Initialize application state
    pub fn init(options: &AppOptions) -> Result<Self, WatchError> {
        info!("Initializing application state...");

        let http_client = Arc::new(HttpClient::new(&options.backend_base_url)?);
        let token_provider: Arc<dyn TokenProvider> =
            Arc::new(StaticTokenProvider::new(options.api_token.clone()));

        let store = Arc::new(SnapshotStore::new());
        let notifications = Arc::new(NotificationQueue::new(options.notification_ttl));
        let poll_trigger = Arc::new(Notify::new());

        let watcher = Arc::new(Watcher::new(
            http_client.clone(),
            token_provider.clone(),
            store.clone(),
            notifications.clone(),
        ));

        Ok(Self {
            http_client,
            token_provider,
            store,
            notifications,
            watcher,
            poll_trigger,
        })
    }

    /// Shutdown application state
    pub fn shutdown(&self) {
        info!("Shutting down application state...");
        // Pending notifications must not outlive the session
        self.notifications.clear();
    }
}
