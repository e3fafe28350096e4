use crate::cache::DnsCache;
use crate::model::{DnsQuery, DnsResponse, normalize_domain};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

const NXDOMAIN_TTL_SECS: u32 = 300;
const FINGERPRINT_TTL_SECS: u32 = 300;

/// The deterministic fake-IP pool for fingerprinting-domain responses.
pub const FAKE_IPS: [IpAddr; 5] = [
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
    IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)),
    IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1)),
    IpAddr::V4(Ipv4Addr::new(203, 0, 113, 1)),
];

/// Classifies, caches, and synthesizes responses for DNS queries.
pub struct DnsFilterEngine {
    blocklist: BTreeSet<String>,
    fingerprinting_keywords: BTreeSet<String>,
    cache: DnsCache,
}

impl DnsFilterEngine {
    pub fn new(blocklist: BTreeSet<String>, fingerprinting_keywords: BTreeSet<String>) -> Self {
        Self {
            blocklist: blocklist.iter().map(|d| normalize_domain(d)).collect(),
            fingerprinting_keywords: fingerprinting_keywords
                .iter()
                .map(|k| k.to_ascii_lowercase())
                .collect(),
            cache: DnsCache::default(),
        }
    }

    /// True iff `domain` or any parent label is present in the blocklist.
    /// Matching is case-insensitive; a trailing dot is stripped first.
    pub fn is_blocked(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        parent_chain(&domain).any(|candidate| self.blocklist.contains(candidate))
    }

    /// True iff any label of `domain` equals or starts with a configured
    /// fingerprinting keyword (e.g. `fingerprint`, `tracking`, `analytics`).
    pub fn is_fingerprinting_domain(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        domain.split('.').any(|label| {
            self.fingerprinting_keywords
                .iter()
                .any(|kw| label == kw.as_str() || label.starts_with(kw.as_str()))
        })
    }

    /// Classifies `query`, returning `Some(response)` when privarion should
    /// answer locally, or `None` to signal "forward upstream."
    pub fn filter_dns_query(&self, query: &DnsQuery) -> Option<DnsResponse> {
        if let Some(cached) = self.cache.get(&query.domain, query.qtype) {
            return Some(DnsResponse {
                id: query.id,
                ..cached
            });
        }

        if self.is_blocked(&query.domain) {
            let response = DnsResponse::nxdomain(query, NXDOMAIN_TTL_SECS);
            self.cache.insert(
                &query.domain,
                query.qtype,
                response.clone(),
                Duration::from_secs(NXDOMAIN_TTL_SECS as u64),
            );
            tracing::debug!(domain = %query.domain, "Blocked DNS query, synthesized NXDOMAIN");
            return Some(response);
        }

        if self.is_fingerprinting_domain(&query.domain) {
            let response = self.create_fake_response(query);
            self.cache.insert(
                &query.domain,
                query.qtype,
                response.clone(),
                Duration::from_secs(FINGERPRINT_TTL_SECS as u64),
            );
            tracing::debug!(domain = %query.domain, "Fingerprinting domain, synthesized fake address");
            return Some(response);
        }

        None
    }

    /// Constructs the fingerprinting-case response. Exposed directly for
    /// tests that want to assert on fake-IP selection without going through
    /// the cache.
    pub fn create_fake_response(&self, query: &DnsQuery) -> DnsResponse {
        let address = fake_ip_for(&query.domain);
        DnsResponse::with_address(query, address, FINGERPRINT_TTL_SECS)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> u64 {
        self.cache.len()
    }
}

fn parent_chain(domain: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(domain);
    std::iter::from_fn(move || {
        let current = rest?;
        rest = current.split_once('.').map(|(_, tail)| tail);
        Some(current)
    })
}

/// Deterministic, per-domain selection from [`FAKE_IPS`].
fn fake_ip_for(domain: &str) -> IpAddr {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    domain.hash(&mut hasher);
    let index = (hasher.finish() as usize) % FAKE_IPS.len();
    FAKE_IPS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DnsQueryType;

    fn engine() -> DnsFilterEngine {
        DnsFilterEngine::new(
            BTreeSet::from(["google-analytics.com".to_string()]),
            BTreeSet::from(["fingerprint".to_string(), "tracking".to_string()]),
        )
    }

    #[test]
    fn blocked_domain_yields_cached_nxdomain_on_second_query() {
        let engine = engine();
        let query = DnsQuery::new(1, "google-analytics.com", DnsQueryType::A);

        let first = engine.filter_dns_query(&query).unwrap();
        assert_eq!(first.id, 1);
        assert!(first.addresses.is_empty());
        assert_eq!(first.ttl, 300);
        assert!(!first.cached);

        let second = engine.filter_dns_query(&query).unwrap();
        assert!(second.cached);
        assert_eq!(second.addresses, first.addresses);
        assert_eq!(second.ttl, first.ttl);
    }

    #[test]
    fn blocked_domain_matches_regardless_of_case_or_trailing_dot() {
        let engine = engine();
        assert!(engine.is_blocked("EXAMPLE.COM.") == engine.is_blocked("example.com"));
        assert!(engine.is_blocked("GOOGLE-ANALYTICS.COM."));
    }

    #[test]
    fn fingerprinting_domain_yields_one_fake_address() {
        let engine = engine();
        let query = DnsQuery::new(3, "fingerprint.tracker.com", DnsQueryType::A);

        let response = engine.filter_dns_query(&query).unwrap();
        assert_eq!(response.addresses.len(), 1);
        assert!(FAKE_IPS.contains(&response.addresses[0]));
        assert_eq!(response.ttl, 300);
    }

    #[test]
    fn allowed_domain_forwards_upstream() {
        let engine = engine();
        let query = DnsQuery::new(4, "apple.com", DnsQueryType::A);
        assert!(engine.filter_dns_query(&query).is_none());
    }

    #[test]
    fn clear_cache_drops_prior_entries() {
        let engine = engine();
        let query = DnsQuery::new(1, "google-analytics.com", DnsQueryType::A);
        engine.filter_dns_query(&query).unwrap();
        assert!(engine.cache_len() > 0);

        engine.clear_cache();
        assert_eq!(engine.cache_len(), 0);
    }

    #[test]
    fn fake_ip_selection_is_deterministic_per_domain() {
        let a = fake_ip_for("fingerprint.tracker.com");
        let b = fake_ip_for("fingerprint.tracker.com");
        assert_eq!(a, b);
    }

    #[test]
    fn subdomain_of_blocked_domain_is_blocked() {
        let engine = engine();
        assert!(engine.is_blocked("www.google-analytics.com"));
    }
}
