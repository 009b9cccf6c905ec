use dnsproxy_application::ports::{HostsReloadPort, ReloadOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Polls the hosts file for changes and swaps in the new table.
pub struct HostsReloadJob {
    hosts: Arc<dyn HostsReloadPort>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl HostsReloadJob {
    pub fn new(hosts: Arc<dyn HostsReloadPort>) -> Self {
        Self {
            hosts,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Runs until the cancellation token fires. The first check happens one
    /// interval after start, the file having just been loaded.
    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting hosts file reload job"
        );

        let mut interval = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("HostsReloadJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    match self.hosts.reload_if_changed().await {
                        Ok(ReloadOutcome::Unchanged) => debug!("Hosts file unchanged"),
                        Ok(ReloadOutcome::Reloaded { entries }) => {
                            info!(entries, "Hosts file change applied");
                        }
                        Err(e) => warn!(error = %e, "Hosts file check failed"),
                    }
                }
            }
        }
    }
}
