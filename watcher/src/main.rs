//! Zipp Watcher - Entry Point
//!
//! A small daemon that keeps a local view of Zipp deployments in sync with
//! the backend, detects status transitions, and serves stats locally.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use zippwatch::app::options::{AppOptions, ServerOptions};
use zippwatch::app::run::run;
use zippwatch::logs::{init_logging, LogOptions};
use zippwatch::storage::settings::Settings;
use zippwatch::utils::version_info;
use zippwatch::workers::poller;

use tracing::{error, info, warn};

const DEFAULT_SETTINGS_PATH: &str = "zippwatch.json";

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        println!("{}", serde_json::to_string_pretty(&version).unwrap());
        return;
    }

    // Retrieve the settings file
    let settings_path = cli_args
        .get("settings")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let settings = match Settings::load(&settings_path).await {
        Ok(settings) => settings,
        Err(e) => {
            warn!(
                "Unable to read settings file {:?} ({}), using defaults",
                settings_path, e
            );
            Settings::default()
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    // Resolve the bearer token
    let api_token = match settings.resolve_token() {
        Ok(token) => token,
        Err(e) => {
            error!("No usable bearer token: {}", e);
            return;
        }
    };

    // Run the watcher
    let options = AppOptions {
        backend_base_url: settings.backend.base_url.clone(),
        api_token,
        enable_server: settings.enable_server,
        server: ServerOptions {
            host: settings.server.host.clone(),
            port: settings.server.port,
        },
        poller: poller::Options {
            interval: Duration::from_secs(settings.polling_interval_secs),
            ..Default::default()
        },
        notification_ttl: Duration::from_secs(settings.notification_ttl_secs),
        ..Default::default()
    };

    info!("Running Zipp watcher against {}", options.backend_base_url);
    let result = run(options, await_shutdown_signal()).await;
    if let Err(e) = result {
        error!("Failed to run the watcher: {e}");
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).unwrap();
        let mut sigint = signal(SignalKind::interrupt()).unwrap();

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Ctrl+C received, shutting down...");
    }
}
