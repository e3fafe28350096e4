use thiserror::Error;

/// Errors surfaced by the tunnel orchestrator.
#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("tunnel configuration is invalid: {reason}")]
    TunnelConfigurationInvalid { reason: String },

    #[error("tunnel failed to start after {attempts} attempt(s): {reason}")]
    TunnelStartFailed { attempts: u32, reason: String },

    #[error("failed to restore host network settings: {reason}")]
    NetworkSettingsRestoreFailed { reason: String },

    #[error("packet processing failed: {reason}")]
    PacketProcessingFailed { reason: String },

    #[error("failed to bind the DNS proxy: {reason}")]
    DnsProxyBindFailed { reason: String },
}

impl TunnelError {
    /// An operator-readable paragraph with concrete next steps.
    pub fn troubleshooting(&self) -> String {
        match self {
            Self::TunnelConfigurationInvalid { reason } => format!(
                "The tunnel configuration was rejected ({reason}). Check dns_server_address, \
                 tunnel_remote_address, ipv4_address/ipv4_subnet_mask, ipv6_address/ipv6_prefix_length, \
                 and mtu against the documented ranges, then retry."
            ),
            Self::TunnelStartFailed { attempts, reason } => format!(
                "The tunnel did not come up after {attempts} attempt(s) ({reason}). Verify the host \
                 permits creating a virtual network interface, that no other tunnel process holds the \
                 device, and that the retry policy's max_attempts is high enough for the environment."
            ),
            Self::NetworkSettingsRestoreFailed { reason } => format!(
                "Host network settings could not be fully restored after tunnel teardown ({reason}). \
                 Inspect routing tables and DNS resolver configuration manually; the tunnel interface \
                 itself has already been torn down."
            ),
            Self::PacketProcessingFailed { reason } => format!(
                "A packet could not be processed ({reason}). This does not affect tunnel state; check \
                 the packet filter engine's malformed-packet counter for a recurring pattern."
            ),
            Self::DnsProxyBindFailed { reason } => format!(
                "The DNS proxy could not bind its listening socket ({reason}). Confirm port 53 is free \
                 on the configured dns_server_address and that the process has permission to bind it."
            ),
        }
    }
}
