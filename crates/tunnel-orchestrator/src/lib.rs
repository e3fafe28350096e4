//! Packet-tunnel lifecycle: configuration, retrying start, idempotent stop.

mod config;
mod error;
mod installer;
mod orchestrator;
mod retry;
mod stats;
mod state;

pub use config::TunnelConfiguration;
pub use error::TunnelError;
pub use installer::TunnelInstaller;
pub use orchestrator::TunnelOrchestrator;
pub use retry::RetryPolicy;
pub use stats::{TunnelCounts, TunnelStats};
pub use state::TunnelState;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct FlakyInstaller {
        remaining_failures: AtomicU32,
    }

    #[async_trait]
    impl TunnelInstaller for FlakyInstaller {
        async fn install(&self, _config: &TunnelConfiguration) -> Result<(), TunnelError> {
            if self.remaining_failures.load(Ordering::SeqCst) > 0 {
                self.remaining_failures.fetch_sub(1, Ordering::SeqCst);
                return Err(TunnelError::TunnelConfigurationInvalid {
                    reason: "simulated failure".to_string(),
                });
            }
            Ok(())
        }

        async fn restore_network_settings(&self) -> Result<(), TunnelError> {
            Ok(())
        }
    }

    struct AlwaysFailingInstaller;

    #[async_trait]
    impl TunnelInstaller for AlwaysFailingInstaller {
        async fn install(&self, _config: &TunnelConfiguration) -> Result<(), TunnelError> {
            Err(TunnelError::TunnelConfigurationInvalid {
                reason: "always fails".to_string(),
            })
        }

        async fn restore_network_settings(&self) -> Result<(), TunnelError> {
            Ok(())
        }
    }

    fn fast_retry_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn start_succeeds_after_transient_failures() {
        let installer = Arc::new(FlakyInstaller {
            remaining_failures: AtomicU32::new(1),
        });
        let orchestrator = TunnelOrchestrator::new(installer, fast_retry_policy());

        orchestrator
            .start(TunnelConfiguration::default())
            .await
            .unwrap();
        assert_eq!(orchestrator.state(), TunnelState::Running);
        assert_eq!(orchestrator.stats().start_successes, 1);
    }

    #[tokio::test]
    async fn retry_exhaustion_stops_after_exactly_max_attempts() {
        let installer = Arc::new(AlwaysFailingInstaller);
        let orchestrator = TunnelOrchestrator::new(installer, fast_retry_policy());

        let err = orchestrator
            .start(TunnelConfiguration::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TunnelError::TunnelStartFailed { attempts: 3, .. }));
        assert_eq!(orchestrator.state(), TunnelState::Stopped);
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let installer = Arc::new(FlakyInstaller {
            remaining_failures: AtomicU32::new(0),
        });
        let orchestrator = TunnelOrchestrator::new(installer, fast_retry_policy());
        orchestrator
            .start(TunnelConfiguration::default())
            .await
            .unwrap();

        orchestrator.stop().await.unwrap();
        orchestrator.stop().await.unwrap();
        assert_eq!(orchestrator.state(), TunnelState::Stopped);
        assert_eq!(orchestrator.stats().stops, 1);
    }

    #[tokio::test]
    async fn invalid_configuration_never_reaches_the_installer() {
        let installer = Arc::new(AlwaysFailingInstaller);
        let orchestrator = TunnelOrchestrator::new(installer, fast_retry_policy());

        let mut config = TunnelConfiguration::default();
        config.mtu = 1;
        let err = orchestrator.start(config).await.unwrap_err();
        assert!(matches!(err, TunnelError::TunnelConfigurationInvalid { .. }));
        assert_eq!(orchestrator.stats().start_attempts, 0);
    }
}
