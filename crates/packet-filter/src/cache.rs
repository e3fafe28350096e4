use crate::model::{Decision, TransportProtocol};
use moka::Expiry;
use moka::sync::Cache;
use std::net::IpAddr;
use std::time::{Duration, Instant};

pub(crate) type DecisionKey = (IpAddr, u16, TransportProtocol);

struct TtlExpiry(Duration);

impl Expiry<DecisionKey, Decision> for TtlExpiry {
    fn expire_after_create(
        &self,
        _key: &DecisionKey,
        _value: &Decision,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(self.0)
    }
}

/// The per-destination verdict cache backing `filter_packet`, built on
/// `moka` for sharded, non-blocking reads. Keyed on `(ip, port, protocol)`,
/// which is a known soundness gap, not a resolved one: the underlying
/// blocklist is domain-based, and this cache has no reverse-DNS step to
/// reconcile the two.
#[derive(Clone)]
pub struct DecisionCache {
    inner: Cache<DecisionKey, Decision>,
}

impl DecisionCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(TtlExpiry(ttl))
                .build(),
        }
    }

    pub(crate) fn get(&self, key: &DecisionKey) -> Option<Decision> {
        self.inner.get(key)
    }

    pub(crate) fn insert(&self, key: DecisionKey, decision: Decision) {
        self.inner.insert(key, decision);
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }

    pub fn len(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DecisionCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60), 50_000)
    }
}
