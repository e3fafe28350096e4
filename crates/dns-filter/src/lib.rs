//! DNS query classification, caching, and fake-response synthesis.

mod cache;
mod engine;
mod model;

pub use cache::{DnsCache, DnsCacheEntry};
pub use engine::{DnsFilterEngine, FAKE_IPS};
pub use model::{DnsQuery, DnsQueryType, DnsResponse, normalize_domain};
