use crate::config::TunnelConfiguration;
use crate::error::TunnelError;
use async_trait::async_trait;

/// The host-provided tunnel surface the orchestrator drives. Production
/// code implements this against the platform's packet-tunnel API; tests
/// substitute a fake that can be told to fail a fixed number of times.
#[async_trait]
pub trait TunnelInstaller: Send + Sync {
    async fn install(&self, config: &TunnelConfiguration) -> Result<(), TunnelError>;
    async fn restore_network_settings(&self) -> Result<(), TunnelError>;
}
