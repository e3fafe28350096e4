use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for tunnel lifecycle events, exposed for diagnostics,
/// consistent with the packet filter's own counters.
#[derive(Debug, Default)]
pub struct TunnelStats {
    pub start_attempts: AtomicU64,
    pub start_successes: AtomicU64,
    pub start_failures: AtomicU64,
    pub stops: AtomicU64,
    pub restore_failures: AtomicU64,
}

impl TunnelStats {
    pub fn snapshot(&self) -> TunnelCounts {
        TunnelCounts {
            start_attempts: self.start_attempts.load(Ordering::Relaxed),
            start_successes: self.start_successes.load(Ordering::Relaxed),
            start_failures: self.start_failures.load(Ordering::Relaxed),
            stops: self.stops.load(Ordering::Relaxed),
            restore_failures: self.restore_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TunnelCounts {
    pub start_attempts: u64,
    pub start_successes: u64,
    pub start_failures: u64,
    pub stops: u64,
    pub restore_failures: u64,
}
