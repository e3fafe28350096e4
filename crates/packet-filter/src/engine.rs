use crate::cache::DecisionCache;
use crate::model::{Decision, FilterVerdict, NetworkDestination, TransportProtocol};
use crate::parse::{IpFamily, extract_destination};
use config_snapshot::{AppRule, RulePolicy};
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Running counters for the packet-filter fast path. The filtering function
/// itself never surfaces errors; malformed and dropped packets are
/// accounted for here instead.
#[derive(Debug, Default)]
pub struct PacketFilterStats {
    pub allowed: AtomicU64,
    pub dropped: AtomicU64,
    pub modified: AtomicU64,
    pub malformed: AtomicU64,
}

impl PacketFilterStats {
    pub fn snapshot(&self) -> PacketFilterCounts {
        PacketFilterCounts {
            allowed: self.allowed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            modified: self.modified.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketFilterCounts {
    pub allowed: u64,
    pub dropped: u64,
    pub modified: u64,
    pub malformed: u64,
}

/// Parses, caches, and applies filtering verdicts to raw network packets.
pub struct PacketFilterEngine {
    allowlist: BTreeSet<IpAddr>,
    blocklist: BTreeSet<IpAddr>,
    fingerprinting: BTreeSet<IpAddr>,
    app_rules: Vec<AppRule>,
    cache: DecisionCache,
    stats: PacketFilterStats,
}

impl PacketFilterEngine {
    pub fn new(
        allowlist: BTreeSet<IpAddr>,
        blocklist: BTreeSet<IpAddr>,
        fingerprinting: BTreeSet<IpAddr>,
        app_rules: Vec<AppRule>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            allowlist,
            blocklist,
            fingerprinting,
            app_rules,
            cache: DecisionCache::new(cache_ttl, 50_000),
            stats: PacketFilterStats::default(),
        }
    }

    /// Filters a packet with no application context, so only global rules
    /// apply.
    pub fn filter_packet(&self, packet: &[u8], ip_family: IpFamily) -> FilterVerdict {
        self.filter_packet_for_app(packet, ip_family, None)
    }

    /// As `filter_packet`, but resolves an explicit per-application rule
    /// ahead of the global tie-break chain when `app` is known, used by the
    /// tunnel orchestrator, which has process/app context a bare packet does
    /// not carry.
    pub fn filter_packet_for_app(
        &self,
        packet: &[u8],
        ip_family: IpFamily,
        app: Option<&str>,
    ) -> FilterVerdict {
        let Some(dest) = extract_destination(packet, ip_family) else {
            self.stats.malformed.fetch_add(1, Ordering::Relaxed);
            self.stats.dropped.fetch_add(1, Ordering::Relaxed);
            return FilterVerdict::Drop;
        };

        let key = (dest.ip, dest.port, dest.protocol);
        let decision = match self.cache.get(&key) {
            Some(decision) => decision,
            None => {
                let decision = self.evaluate(&dest, app);
                self.cache.insert(key, decision);
                decision
            }
        };

        self.record(decision);
        apply(decision, packet)
    }

    fn evaluate(&self, dest: &NetworkDestination, app: Option<&str>) -> Decision {
        if let Some(app) = app {
            if let Some(rule) = self.matching_app_rule(app, dest) {
                return match rule.policy {
                    RulePolicy::Allow => Decision::Allow,
                    RulePolicy::Block => Decision::Drop,
                };
            }
        }

        if self.allowlist.contains(&dest.ip) {
            return Decision::Allow;
        }
        if self.blocklist.contains(&dest.ip) {
            return Decision::Drop;
        }
        if self.fingerprinting.contains(&dest.ip) {
            return Decision::Modify;
        }
        Decision::Allow
    }

    fn matching_app_rule(&self, app: &str, dest: &NetworkDestination) -> Option<&AppRule> {
        self.app_rules.iter().find(|rule| {
            rule.application == app
                && rule.domain_or_ip == dest.ip.to_string()
                && rule
                    .protocol
                    .map_or(true, |p| protocol_matches(p, dest.protocol))
        })
    }

    fn record(&self, decision: Decision) {
        match decision {
            Decision::Allow => self.stats.allowed.fetch_add(1, Ordering::Relaxed),
            Decision::Drop => self.stats.dropped.fetch_add(1, Ordering::Relaxed),
            Decision::Modify => self.stats.modified.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Empties the decision cache; invoked on `ConfigSnapshot` change.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> u64 {
        self.cache.len()
    }

    pub fn stats(&self) -> PacketFilterCounts {
        self.stats.snapshot()
    }
}

fn protocol_matches(config: config_snapshot::TransportProtocol, wire: TransportProtocol) -> bool {
    use config_snapshot::TransportProtocol as Cfg;
    matches!(
        (config, wire),
        (Cfg::Tcp, TransportProtocol::Tcp)
            | (Cfg::Udp, TransportProtocol::Udp)
            | (Cfg::Icmp, TransportProtocol::Icmp)
            | (Cfg::Other, TransportProtocol::Other(_))
    )
}

fn apply(decision: Decision, packet: &[u8]) -> FilterVerdict {
    match decision {
        Decision::Allow => FilterVerdict::Allow(packet.to_vec()),
        Decision::Drop => FilterVerdict::Drop,
        Decision::Modify => FilterVerdict::Modify(packet.to_vec()),
    }
}
