//! Polling worker for periodic deployment refresh

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, error, info};

use crate::sync::watcher::{PollOutcome, Watcher};

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,

    /// Initial delay before first poll
    pub initial_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            initial_delay: Duration::from_millis(200),
        }
    }
}

/// Run the poller worker.
///
/// Each iteration awaits the tick fully before sleeping again, so at most
/// one fetch is ever in flight. A wake on `poll_trigger` forces an
/// immediate ungated poll (used after the user starts a new deployment,
/// which the closed gate could otherwise not observe). The shutdown future
/// cancels the loop between ticks; no work runs after it resolves.
pub async fn run<S, F>(
    options: &Options,
    watcher: &Watcher,
    poll_trigger: Arc<Notify>,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Poller worker starting...");

    // Initial delay, then an ungated first poll to seed the snapshot
    sleep_fn(options.initial_delay).await;
    log_outcome(watcher.force_poll().await);

    loop {
        let forced = tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => false,
            _ = poll_trigger.notified() => true,
        };

        let result = if forced {
            debug!("Poll trigger fired, forcing poll");
            watcher.force_poll().await
        } else {
            watcher.poll_once().await
        };
        log_outcome(result);
    }
}

fn log_outcome(result: Result<PollOutcome, crate::errors::WatchError>) {
    match result {
        Ok(PollOutcome::Skipped) => {
            debug!("Poll tick skipped");
        }
        Ok(PollOutcome::Synced {
            transitions,
            notified,
        }) => {
            debug!(
                "Poll tick synced: {} transitions, {} notified",
                transitions, notified
            );
        }
        Err(e) => {
            error!("Poll tick failed: {}", e);
        }
    }
}
