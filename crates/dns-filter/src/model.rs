use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DnsQueryType {
    A,
    Aaaa,
    Cname,
    Other(u16),
}

/// An incoming DNS query, one per UDP packet on port 53.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub id: u16,
    pub domain: String,
    pub qtype: DnsQueryType,
    pub timestamp: DateTime<Utc>,
}

impl DnsQuery {
    pub fn new(id: u16, domain: impl Into<String>, qtype: DnsQueryType) -> Self {
        Self {
            id,
            domain: normalize_domain(&domain.into()),
            qtype,
            timestamp: Utc::now(),
        }
    }
}

/// Response to a [`DnsQuery`]. An empty `addresses` list with a non-zero TTL
/// means NXDOMAIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponse {
    pub id: u16,
    pub domain: String,
    pub addresses: Vec<IpAddr>,
    pub ttl: u32,
    pub cached: bool,
}

impl DnsResponse {
    pub fn nxdomain(query: &DnsQuery, ttl: u32) -> Self {
        Self {
            id: query.id,
            domain: query.domain.clone(),
            addresses: Vec::new(),
            ttl,
            cached: false,
        }
    }

    pub fn with_address(query: &DnsQuery, address: IpAddr, ttl: u32) -> Self {
        Self {
            id: query.id,
            domain: query.domain.clone(),
            addresses: vec![address],
            ttl,
            cached: false,
        }
    }

    pub fn is_nxdomain(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Lower-cases and strips a trailing dot, producing a punycode-normalized
/// lower-case domain representation. Full punycode (IDNA) normalization is
/// out of scope here; domains arriving already in ASCII/punycode form are
/// passed through unchanged.
pub fn normalize_domain(domain: &str) -> String {
    domain
        .strip_suffix('.')
        .unwrap_or(domain)
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_trailing_dot_and_case() {
        assert_eq!(normalize_domain("EXAMPLE.COM."), "example.com");
        assert_eq!(normalize_domain("example.com"), "example.com");
    }
}
