use thiserror::Error;

/// Aggregates every component's structured error enum behind one type for
/// `CoreContext` entry points, a single workspace-wide wrapper over
/// crate-local `thiserror` enums. The packet filter and DNS filter fast
/// paths never surface errors, so they have no variant here; their
/// failures are only ever visible through counters.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] config_snapshot::ConfigError),

    #[error(transparent)]
    Backup(#[from] identity_backup::BackupError),

    #[error(transparent)]
    Spoof(#[from] identity_spoof::SpoofError),

    #[error(transparent)]
    Tunnel(#[from] tunnel_orchestrator::TunnelError),

    #[error(transparent)]
    Hook(#[from] syscall_hook::HookError),
}

impl CoreError {
    pub fn troubleshooting(&self) -> String {
        match self {
            Self::Config(e) => e.troubleshooting(),
            Self::Backup(e) => e.troubleshooting(),
            Self::Spoof(e) => e.troubleshooting(),
            Self::Tunnel(e) => e.troubleshooting(),
            Self::Hook(e) => e.troubleshooting(),
        }
    }
}
