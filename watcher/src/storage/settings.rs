//! Settings file management

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::WatchError;
use crate::logs::LogLevel;

/// Environment variable consulted when the settings file has no token
pub const TOKEN_ENV_VAR: &str = "ZIPPWATCH_TOKEN";

/// Watcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Bearer token for backend requests; falls back to ZIPPWATCH_TOKEN
    #[serde(default)]
    pub api_token: Option<String>,

    /// Enable local HTTP server
    #[serde(default = "default_true")]
    pub enable_server: bool,

    /// Local server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Polling interval in seconds
    #[serde(default = "default_polling_interval")]
    pub polling_interval_secs: u64,

    /// Seconds a notification stays visible
    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_polling_interval() -> u64 {
    3
}

fn default_notification_ttl() -> u64 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            backend: BackendSettings::default(),
            api_token: None,
            enable_server: true,
            server: ServerSettings::default(),
            polling_interval_secs: 3,
            notification_ttl_secs: 5,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, WatchError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let settings = serde_json::from_str(&raw)?;
        Ok(settings)
    }

    /// Bearer token from the file or the environment
    pub fn resolve_token(&self) -> Result<String, WatchError> {
        if let Some(token) = &self.api_token {
            if !token.is_empty() {
                return Ok(token.clone());
            }
        }
        std::env::var(TOKEN_ENV_VAR).map_err(|_| {
            WatchError::TokenError(format!(
                "no api_token in settings and {} is not set",
                TOKEN_ENV_VAR
            ))
        })
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend API
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

/// Local HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host to bind to
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8090
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}
