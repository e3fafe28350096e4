use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Diagnostic events surfaced to operators and UIs over a best-effort
/// broadcast channel, a typed event stream alongside structured logging
/// rather than a replacement for it. Subscribers that never call
/// [`CoreContext::events`] lose nothing, since every event here is also
/// `tracing`-logged at its point of origin.
#[derive(Debug, Clone)]
pub enum CoreEvent {
    HookInstalled {
        function: String,
        at: DateTime<Utc>,
    },
    HookRemoved {
        function: String,
        at: DateTime<Utc>,
    },
    BackupCreated {
        backup_id: String,
        identity_type: String,
        at: DateTime<Utc>,
    },
    BackupRestored {
        backup_id: String,
        at: DateTime<Utc>,
    },
    TunnelStateChanged {
        state: tunnel_orchestrator::TunnelState,
        at: DateTime<Utc>,
    },
    WatchdogFired {
        component: String,
        at: DateTime<Utc>,
    },
}

/// Capacity chosen generously relative to the rate these events fire at in
/// practice (human-scale config/backup/tunnel operations, not per-packet) so
/// a slow subscriber lags rather than stalls a publisher.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (sender, _receiver) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }
}

impl EventBus {
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Drops the event on the floor if there are no subscribers; publishers
    /// never block or error on a quiet channel.
    pub fn publish(&self, event: CoreEvent) {
        let _ = self.sender.send(event);
    }
}
