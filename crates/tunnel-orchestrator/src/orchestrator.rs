use crate::config::TunnelConfiguration;
use crate::error::TunnelError;
use crate::installer::TunnelInstaller;
use crate::retry::RetryPolicy;
use crate::state::TunnelState;
use crate::stats::{TunnelCounts, TunnelStats};
use backoff::backoff::Backoff;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEFAULT_WATCHDOG_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives a tunnel through `Stopped -> Starting -> Running -> Stopping ->
/// Stopped`, retrying `Starting` per the configured policy and restoring
/// host network settings on every exit path.
pub struct TunnelOrchestrator {
    installer: Arc<dyn TunnelInstaller>,
    retry: RetryPolicy,
    watchdog_timeout: Duration,
    state: Mutex<TunnelState>,
    cancellation: CancellationToken,
    stats: TunnelStats,
}

impl TunnelOrchestrator {
    pub fn new(installer: Arc<dyn TunnelInstaller>, retry: RetryPolicy) -> Self {
        Self {
            installer,
            retry,
            watchdog_timeout: DEFAULT_WATCHDOG_TIMEOUT,
            state: Mutex::new(TunnelState::Stopped),
            cancellation: CancellationToken::new(),
            stats: TunnelStats::default(),
        }
    }

    pub fn with_watchdog_timeout(mut self, timeout: Duration) -> Self {
        self.watchdog_timeout = timeout;
        self
    }

    pub fn state(&self) -> TunnelState {
        *self.state.lock()
    }

    pub fn stats(&self) -> TunnelCounts {
        self.stats.snapshot()
    }

    /// Validates `config`, then attempts installation with exponential
    /// backoff up to `retry.max_attempts`. Any failure path restores prior
    /// host network settings and leaves the state machine `Stopped`.
    pub async fn start(&self, config: TunnelConfiguration) -> Result<(), TunnelError> {
        config.validate()?;
        *self.state.lock() = TunnelState::Starting;

        match tokio::time::timeout(self.watchdog_timeout, self.attempt_start(&config)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("tunnel start deadlocked past the watchdog timeout, stopping");
                *self.state.lock() = TunnelState::Stopped;
                let _ = self.installer.restore_network_settings().await;
                Err(TunnelError::TunnelStartFailed {
                    attempts: self.stats.start_attempts.load(Ordering::Relaxed) as u32,
                    reason: "watchdog deadline exceeded".to_string(),
                })
            }
        }
    }

    async fn attempt_start(&self, config: &TunnelConfiguration) -> Result<(), TunnelError> {
        let mut backoff = self.retry.backoff();
        let mut attempt = 0u32;
        let mut last_reason = String::new();

        loop {
            attempt += 1;
            self.stats.start_attempts.fetch_add(1, Ordering::Relaxed);

            match self.installer.install(config).await {
                Ok(()) => {
                    *self.state.lock() = TunnelState::Running;
                    self.stats
                        .start_successes
                        .fetch_add(1, Ordering::Relaxed);
                    return Ok(());
                }
                Err(err) => {
                    last_reason = err.to_string();
                    if attempt >= self.retry.max_attempts {
                        self.stats
                            .start_failures
                            .fetch_add(1, Ordering::Relaxed);
                        *self.state.lock() = TunnelState::Stopped;
                        if let Err(restore_err) = self.installer.restore_network_settings().await {
                            tracing::warn!(error = %restore_err, "failed to restore network settings after exhausted retries");
                        }
                        return Err(TunnelError::TunnelStartFailed {
                            attempts: attempt,
                            reason: last_reason,
                        });
                    }

                    let delay = backoff.next_backoff().unwrap_or(self.retry.max_delay);
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = self.cancellation.cancelled() => {
                            *self.state.lock() = TunnelState::Stopped;
                            return Err(TunnelError::TunnelStartFailed {
                                attempts: attempt,
                                reason: "start cancelled between retry attempts".to_string(),
                            });
                        }
                    }
                }
            }
        }
    }

    /// Idempotent: a second call while already `Stopped` succeeds without
    /// contacting the installer again.
    pub async fn stop(&self) -> Result<(), TunnelError> {
        {
            let mut state = self.state.lock();
            if state.is_stopped() {
                return Ok(());
            }
            *state = TunnelState::Stopping;
        }

        let result = self.installer.restore_network_settings().await;
        *self.state.lock() = TunnelState::Stopped;
        self.stats.stops.fetch_add(1, Ordering::Relaxed);

        if let Err(err) = &result {
            self.stats
                .restore_failures
                .fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %err, "network settings restore failed during stop");
        }
        result
    }

    /// Cancels an in-flight `start()`'s wait between retry attempts.
    pub fn cancel_start(&self) {
        self.cancellation.cancel();
    }
}
