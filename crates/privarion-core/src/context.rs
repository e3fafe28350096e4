use crate::error::CoreError;
use crate::events::{CoreEvent, EventBus};
use chrono::Utc;
use config_snapshot::ConfigSnapshot;
use dns_filter::{DnsFilterEngine, DnsQuery, DnsResponse};
use identity_backup::{IdentityBackupStore, IdentityType};
use identity_spoof::{HardwareIdentifierEngine, IdentitySpoofingManager};
use packet_filter::{FilterVerdict, IpFamily, PacketFilterEngine};
use parking_lot::RwLock;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use syscall_hook::SyscallInterceptionManager;
use tokio::sync::broadcast;
use tunnel_orchestrator::{RetryPolicy, TunnelConfiguration, TunnelInstaller, TunnelOrchestrator};
use uuid::Uuid;

/// Ties the per-process engines together into a single handle: one
/// `CoreContext` per daemon process, shared across its async tasks and
/// interposer-facing IPC behind `Arc`. Each engine keeps its own internal
/// synchronization; `CoreContext` only adds the coarse-grained swap points
/// (config reload) that touch more than one engine at once.
pub struct CoreContext {
    config: RwLock<Arc<ConfigSnapshot>>,
    dns_engine: RwLock<DnsFilterEngine>,
    packet_engine: RwLock<PacketFilterEngine>,
    backup_store: Arc<IdentityBackupStore>,
    spoof_manager: Arc<IdentitySpoofingManager>,
    hook_manager: Arc<SyscallInterceptionManager>,
    tunnel: Arc<TunnelOrchestrator>,
    events: EventBus,
}

impl CoreContext {
    pub fn new(
        config: ConfigSnapshot,
        backup_root_dir: impl Into<PathBuf>,
        hardware_engine: Arc<dyn HardwareIdentifierEngine>,
        hook_library_path: impl Into<PathBuf>,
        tunnel_installer: Arc<dyn TunnelInstaller>,
        tunnel_retry: RetryPolicy,
    ) -> Result<Self, CoreError> {
        let backup_store = Arc::new(IdentityBackupStore::open(backup_root_dir)?);
        let spoof_manager = Arc::new(IdentitySpoofingManager::new(
            hardware_engine,
            backup_store.clone(),
        ));
        let hook_manager = Arc::new(SyscallInterceptionManager::new(hook_library_path));
        let tunnel = Arc::new(TunnelOrchestrator::new(tunnel_installer, tunnel_retry));

        let dns_engine = DnsFilterEngine::new(
            config.blocklist.clone(),
            config.fingerprinting_keywords.clone(),
        );
        let packet_engine = PacketFilterEngine::new(
            config
                .allowlist
                .iter()
                .filter_map(|d| d.parse::<IpAddr>().ok())
                .collect(),
            config
                .blocklist
                .iter()
                .filter_map(|d| d.parse::<IpAddr>().ok())
                .collect(),
            std::collections::BTreeSet::new(),
            config.app_rules.clone(),
            std::time::Duration::from_secs(60),
        );

        Ok(Self {
            config: RwLock::new(Arc::new(config)),
            dns_engine: RwLock::new(dns_engine),
            packet_engine: RwLock::new(packet_engine),
            backup_store,
            spoof_manager,
            hook_manager,
            tunnel,
            events: EventBus::default(),
        })
    }

    pub fn events(&self) -> broadcast::Receiver<CoreEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> Arc<ConfigSnapshot> {
        self.config.read().clone()
    }

    /// Atomically replaces the active configuration and rebuilds the DNS
    /// and packet filter engines from it. The syscall hook manager and
    /// tunnel orchestrator read their configuration per-call, so they need
    /// no rebuild here.
    pub fn reload_config(&self, new_config: ConfigSnapshot) {
        let dns_engine = DnsFilterEngine::new(
            new_config.blocklist.clone(),
            new_config.fingerprinting_keywords.clone(),
        );
        let packet_engine = PacketFilterEngine::new(
            new_config
                .allowlist
                .iter()
                .filter_map(|d| d.parse::<IpAddr>().ok())
                .collect(),
            new_config
                .blocklist
                .iter()
                .filter_map(|d| d.parse::<IpAddr>().ok())
                .collect(),
            std::collections::BTreeSet::new(),
            new_config.app_rules.clone(),
            std::time::Duration::from_secs(60),
        );

        *self.dns_engine.write() = dns_engine;
        *self.packet_engine.write() = packet_engine;
        *self.config.write() = Arc::new(new_config);
    }

    pub fn filter_dns_query(&self, query: &DnsQuery) -> Option<DnsResponse> {
        self.dns_engine.read().filter_dns_query(query)
    }

    pub fn filter_packet(&self, packet: &[u8], family: IpFamily) -> FilterVerdict {
        self.packet_engine.read().filter_packet(packet, family)
    }

    pub fn spoof_identity(
        &self,
        identity_type: IdentityType,
        new_value: &str,
        session: &str,
    ) -> Result<Uuid, CoreError> {
        let backup_id = self
            .spoof_manager
            .spoof(identity_type, new_value, session)?;
        self.events.publish(CoreEvent::BackupCreated {
            backup_id: backup_id.to_string(),
            identity_type: identity_type.as_str().to_string(),
            at: Utc::now(),
        });
        Ok(backup_id)
    }

    pub fn rollback_identity(&self, backup_id: Uuid) -> Result<(), CoreError> {
        self.spoof_manager.rollback(backup_id)?;
        self.events.publish(CoreEvent::BackupRestored {
            backup_id: backup_id.to_string(),
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn install_configured_hooks(&self) -> Result<(), CoreError> {
        let config = self.config();
        self.hook_manager
            .install_configured_hooks(&config.active_modules().syscall_hook)?;
        for function in self.hook_manager.active_hooks() {
            self.events.publish(CoreEvent::HookInstalled {
                function,
                at: Utc::now(),
            });
        }
        Ok(())
    }

    pub fn uninstall_hook(&self, function: &str) -> bool {
        let removed = self.hook_manager.uninstall(function);
        if removed {
            self.events.publish(CoreEvent::HookRemoved {
                function: function.to_string(),
                at: Utc::now(),
            });
        }
        removed
    }

    pub async fn start_tunnel(&self, config: TunnelConfiguration) -> Result<(), CoreError> {
        let result = self.tunnel.start(config).await;
        self.events.publish(CoreEvent::TunnelStateChanged {
            state: self.tunnel.state(),
            at: Utc::now(),
        });
        if let Err(tunnel_orchestrator::TunnelError::TunnelStartFailed { reason, .. }) = &result {
            if reason.contains("watchdog") {
                self.events.publish(CoreEvent::WatchdogFired {
                    component: "tunnel-orchestrator".to_string(),
                    at: Utc::now(),
                });
            }
        }
        Ok(result?)
    }

    pub async fn stop_tunnel(&self) -> Result<(), CoreError> {
        self.tunnel.stop().await?;
        self.events.publish(CoreEvent::TunnelStateChanged {
            state: self.tunnel.state(),
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn backup_store(&self) -> &Arc<IdentityBackupStore> {
        &self.backup_store
    }
}
