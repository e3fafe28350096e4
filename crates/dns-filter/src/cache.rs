use crate::model::{DnsQueryType, DnsResponse};
use moka::Expiry;
use moka::sync::Cache;
use std::time::{Duration, Instant};

/// A cached response plus the TTL it was inserted with. Eviction is lazy on
/// read via moka's per-entry expiry policy below.
#[derive(Debug, Clone)]
pub struct DnsCacheEntry {
    pub response: DnsResponse,
    pub ttl: Duration,
}

struct TtlExpiry;

impl Expiry<(String, DnsQueryType), DnsCacheEntry> for TtlExpiry {
    fn expire_after_create(
        &self,
        _key: &(String, DnsQueryType),
        value: &DnsCacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Concurrent domain -> response cache. Backed by `moka`, for sharded,
/// non-blocking reads and per-entry TTL expiry.
#[derive(Clone)]
pub struct DnsCache {
    inner: Cache<(String, DnsQueryType), DnsCacheEntry>,
}

impl DnsCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(TtlExpiry)
            .build();

        Self { inner }
    }

    /// Returns the cached response with `cached` forced to `true`, or `None`
    /// on miss or expiry.
    pub fn get(&self, domain: &str, qtype: DnsQueryType) -> Option<DnsResponse> {
        let entry = self.inner.get(&(domain.to_string(), qtype))?;
        let mut response = entry.response;
        response.cached = true;
        Some(response)
    }

    pub fn insert(&self, domain: &str, qtype: DnsQueryType, response: DnsResponse, ttl: Duration) {
        self.inner.insert(
            (domain.to_string(), qtype),
            DnsCacheEntry { response, ttl },
        );
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

impl Default for DnsCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}
