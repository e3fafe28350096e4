//! Wires the syscall hook, identity spoofing/backup, network filtering, and
//! tunnel orchestration engines into one per-process handle.

mod context;
mod error;
mod events;
mod telemetry;

pub use context::CoreContext;
pub use error::CoreError;
pub use events::{CoreEvent, EventBus};
pub use telemetry::telemetry_init;

#[cfg(test)]
mod tests {
    use super::*;
    use config_snapshot::ConfigSnapshot;
    use identity_spoof::HardwareIdentifierEngine;
    use identity_backup::IdentityType;
    use std::sync::Arc;
    use tunnel_orchestrator::{RetryPolicy, TunnelConfiguration, TunnelError, TunnelInstaller};

    struct FixedEngine;

    impl HardwareIdentifierEngine for FixedEngine {
        fn current_value(&self, identity_type: IdentityType) -> Result<String, identity_spoof::SpoofError> {
            Ok(format!("original-{}", identity_type.as_str()))
        }
    }

    struct NoopInstaller;

    #[async_trait::async_trait]
    impl TunnelInstaller for NoopInstaller {
        async fn install(&self, _config: &TunnelConfiguration) -> Result<(), TunnelError> {
            Ok(())
        }

        async fn restore_network_settings(&self) -> Result<(), TunnelError> {
            Ok(())
        }
    }

    fn build_context(backup_dir: &std::path::Path) -> CoreContext {
        CoreContext::new(
            ConfigSnapshot::default(),
            backup_dir.to_path_buf(),
            Arc::new(FixedEngine),
            "/opt/privarion/libprivarion_hook_preload.so",
            Arc::new(NoopInstaller),
            RetryPolicy::default(),
        )
        .expect("context construction")
    }

    #[test]
    fn config_reload_rebuilds_the_packet_and_dns_engines_without_losing_other_state() {
        let dir = tempfile::tempdir().unwrap();
        let context = build_context(dir.path());

        let mut new_config = ConfigSnapshot::default();
        new_config.blocklist.insert("ads.example.com".to_string());
        context.reload_config(new_config);

        assert!(
            context
                .config()
                .blocklist
                .contains("ads.example.com")
        );
    }

    #[test]
    fn spoof_then_rollback_round_trips_through_the_context() {
        let dir = tempfile::tempdir().unwrap();
        let context = build_context(dir.path());

        let backup_id = context
            .spoof_identity(IdentityType::Hostname, "spoofed-host", "session-a")
            .unwrap();
        context.rollback_identity(backup_id).unwrap();
    }

    #[tokio::test]
    async fn tunnel_lifecycle_publishes_state_changed_events() {
        let dir = tempfile::tempdir().unwrap();
        let context = build_context(dir.path());
        let mut events = context.events();

        context
            .start_tunnel(TunnelConfiguration::default())
            .await
            .unwrap();
        context.stop_tunnel().await.unwrap();

        let mut saw_state_change = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, CoreEvent::TunnelStateChanged { .. }) {
                saw_state_change = true;
            }
        }
        assert!(saw_state_change);
    }

    #[test]
    fn core_error_converts_from_every_wrapped_crate() {
        fn assert_error(_: CoreError) {}
        assert_error(CoreError::from(config_snapshot::ConfigError::InvalidValue {
            key: "mtu".to_string(),
            reason: "out of range".to_string(),
        }));
    }
}
