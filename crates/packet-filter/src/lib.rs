//! IPv4/IPv6/TCP/UDP/ICMP header parsing and per-destination filtering.

mod cache;
mod engine;
mod model;
mod parse;

pub use cache::DecisionCache;
pub use engine::{PacketFilterCounts, PacketFilterEngine, PacketFilterStats};
pub use model::{Decision, FilterVerdict, NetworkDestination, TransportProtocol};
pub use parse::{IpFamily, extract_destination};
