use std::net::IpAddr;

/// L4 transport, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportProtocol {
    Tcp,
    Udp,
    Icmp,
    Other(u8),
}

impl TransportProtocol {
    fn from_ip_protocol_number(n: u8) -> Self {
        match n {
            6 => Self::Tcp,
            17 => Self::Udp,
            1 | 58 => Self::Icmp,
            other => Self::Other(other),
        }
    }
}

/// The destination a packet is headed to, derived purely from its headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkDestination {
    pub ip: IpAddr,
    pub port: u16,
    pub protocol: TransportProtocol,
}

/// The outcome of filtering a single packet. `Allow`/`Modify` carry the bytes
/// that should actually go out; `Drop` carries nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterVerdict {
    Allow(Vec<u8>),
    Drop,
    Modify(Vec<u8>),
}

impl FilterVerdict {
    pub fn is_drop(&self) -> bool {
        matches!(self, Self::Drop)
    }
}

/// The cache- and rule-evaluation-level decision, independent of any
/// particular packet's bytes. `FilterVerdict` is `Decision` applied to a
/// concrete packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Allow,
    Drop,
    Modify,
}

pub(crate) fn protocol_from_number(n: u8) -> TransportProtocol {
    TransportProtocol::from_ip_protocol_number(n)
}
