use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const DNS_PORT: u16 = 53;
pub const DOT_PORT: u16 = 853;

/// A server endpoint that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    /// Parses `host:port`, `[v6]:port` or `ip:port`; a bare IP or hostname
    /// gets `default_port`.
    pub fn parse_with_default_port(s: &str, default_port: u16) -> Result<Self, String> {
        if let Ok(addr) = s.parse::<UpstreamAddr>() {
            return Ok(addr);
        }
        if let Ok(ip) = s.trim_matches(|c| c == '[' || c == ']').parse::<IpAddr>() {
            return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, default_port)));
        }
        if !s.is_empty() && !s.contains(':') {
            return Ok(UpstreamAddr::Unresolved {
                hostname: s.into(),
                port: default_port,
            });
        }
        Err(format!("Invalid address '{}'", s))
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        if host.contains(':') {
            return None;
        }
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

impl FromStr for UpstreamAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(UpstreamAddr::Resolved(addr));
        }
        match parse_host_port(s) {
            Some((host, _)) if host.is_empty() => Err(format!("Invalid address '{}'", s)),
            Some((host, port)) => Ok(UpstreamAddr::Unresolved {
                hostname: host.into(),
                port,
            }),
            None => Err(format!("Invalid address '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    Udp,
    Tcp,
    Tls,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Udp => "udp",
            TransportKind::Tcp => "tcp",
            TransportKind::Tls => "tcp-tls",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IpFamily {
    #[default]
    Any,
    V4,
    V6,
}

impl IpFamily {
    pub fn allows(&self, ip: &IpAddr) -> bool {
        match self {
            IpFamily::Any => true,
            IpFamily::V4 => ip.is_ipv4(),
            IpFamily::V6 => ip.is_ipv6(),
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            IpFamily::Any => "",
            IpFamily::V4 => "4",
            IpFamily::V6 => "6",
        }
    }
}

/// The substrate carrying one query/response exchange, restricted to an IP
/// family. Displays as the classic network name (`udp`, `tcp4`, `tcp-tls6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transport {
    pub kind: TransportKind,
    pub family: IpFamily,
}

impl Transport {
    pub fn new(kind: TransportKind, family: IpFamily) -> Self {
        Self { kind, family }
    }

    pub fn is_datagram(&self) -> bool {
        self.kind == TransportKind::Udp
    }

    pub fn is_encrypted(&self) -> bool {
        self.kind == TransportKind::Tls
    }

    /// The plain stream transport of the same family, used when a datagram
    /// exchange has to be retried.
    pub fn stream_fallback(&self) -> Transport {
        Transport::new(TransportKind::Tcp, self.family)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.as_str(), self.family.suffix())
    }
}
