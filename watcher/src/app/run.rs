//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::app::options::{AppOptions, LifecycleOptions};
use crate::app::state::AppState;
use crate::errors::WatchError;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::workers::poller;

/// Run the Zipp watcher
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), WatchError> {
    info!("Initializing Zipp watcher...");

    // Create shutdown channel
    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(options.lifecycle.clone());

    // Initialize the app state and workers
    let _app_state = match init(&options, shutdown_tx.clone(), &mut shutdown_manager).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to start watcher: {}", e);
            let _ = shutdown_tx.send(());
            shutdown_manager.shutdown().await?;
            return Err(e);
        }
    };

    // The watcher session lasts until the shutdown signal fires
    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    let _ = shutdown_tx.send(());
    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

async fn init(
    options: &AppOptions,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<Arc<AppState>, WatchError> {
    let app_state = Arc::new(AppState::init(options)?);
    shutdown_manager.with_app_state(app_state.clone())?;

    init_poller_worker(
        options.poller.clone(),
        app_state.clone(),
        shutdown_manager,
        shutdown_tx.subscribe(),
    )?;

    if options.enable_server {
        init_server(
            options,
            app_state.clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )
        .await?;
    }

    Ok(app_state)
}

fn init_poller_worker(
    options: poller::Options,
    app_state: Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), WatchError> {
    info!("Initializing poller worker...");

    let watcher = app_state.watcher.clone();
    let poll_trigger = app_state.poll_trigger.clone();

    let poller_handle = tokio::spawn(async move {
        poller::run(
            &options,
            watcher.as_ref(),
            poll_trigger,
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_poller_worker_handle(poller_handle)?;
    Ok(())
}

async fn init_server(
    options: &AppOptions,
    app_state: Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), WatchError> {
    info!("Initializing local HTTP server...");

    let server_state = ServerState::new(
        app_state.store.clone(),
        app_state.notifications.clone(),
        app_state.watcher.clone(),
        app_state.poll_trigger.clone(),
    );

    let server_handle = serve(&options.server, Arc::new(server_state), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_server_handle(server_handle)?;
    Ok(())
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    lifecycle_options: LifecycleOptions,
    app_state: Option<Arc<AppState>>,
    poller_worker_handle: Option<JoinHandle<()>>,
    server_handle: Option<JoinHandle<Result<(), WatchError>>>,
}

impl ShutdownManager {
    pub fn new(lifecycle_options: LifecycleOptions) -> Self {
        Self {
            lifecycle_options,
            app_state: None,
            poller_worker_handle: None,
            server_handle: None,
        }
    }

    pub fn with_app_state(&mut self, state: Arc<AppState>) -> Result<(), WatchError> {
        if self.app_state.is_some() {
            return Err(WatchError::ShutdownError("app_state already set".to_string()));
        }
        self.app_state = Some(state);
        Ok(())
    }

    pub fn with_poller_worker_handle(&mut self, handle: JoinHandle<()>) -> Result<(), WatchError> {
        if self.poller_worker_handle.is_some() {
            return Err(WatchError::ShutdownError("poller_handle already set".to_string()));
        }
        self.poller_worker_handle = Some(handle);
        Ok(())
    }

    pub fn with_server_handle(
        &mut self,
        handle: JoinHandle<Result<(), WatchError>>,
    ) -> Result<(), WatchError> {
        if self.server_handle.is_some() {
            return Err(WatchError::ShutdownError("server_handle already set".to_string()));
        }
        self.server_handle = Some(handle);
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), WatchError> {
        match tokio::time::timeout(
            self.lifecycle_options.max_shutdown_delay,
            self.shutdown_impl(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, forcing shutdown...",
                    self.lifecycle_options.max_shutdown_delay
                );
                std::process::exit(1);
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), WatchError> {
        info!("Shutting down Zipp watcher...");

        // 1. Poller worker
        if let Some(handle) = self.poller_worker_handle.take() {
            handle
                .await
                .map_err(|e| WatchError::ShutdownError(e.to_string()))?;
        }

        // 2. Local server
        if let Some(handle) = self.server_handle.take() {
            handle
                .await
                .map_err(|e| WatchError::ShutdownError(e.to_string()))??;
        }

        // 3. App state
        if let Some(app_state) = self.app_state.take() {
            app_state.shutdown();
        }

        info!("Shutdown complete");
        Ok(())
    }
}
