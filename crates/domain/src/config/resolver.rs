use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::errors::ConfigError;
use super::provider::Provider;
use crate::transport::{IpFamily, Transport, TransportKind, UpstreamAddr, DNS_PORT, DOT_PORT};

/// One upstream resolver: where it lives and which transports it may use.
///
/// The disable flags are stored exactly as configured. `dot` overrides them at
/// read time through [`ResolverConfig::udp_disabled`] and
/// [`ResolverConfig::tcp_disabled`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub name: String,

    pub server: String,

    #[serde(default)]
    pub no_ip4: bool,

    #[serde(default)]
    pub no_ip6: bool,

    #[serde(default)]
    pub no_udp: bool,

    #[serde(default)]
    pub no_tcp: bool,

    #[serde(default)]
    pub dot: bool,

    #[serde(default)]
    pub tls_key_pin: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    8000
}

impl ResolverConfig {
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            no_ip4: false,
            no_ip6: false,
            no_udp: false,
            no_tcp: false,
            dot: false,
            tls_key_pin: None,
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn localhost() -> Self {
        Self::new("localhost", format!("127.0.0.1:{}", DNS_PORT))
    }

    /// Plain resolver on port 53, or a pinned DoT resolver on port 853.
    pub fn from_provider(provider: &Provider, dot: bool) -> Self {
        let port = if dot { DOT_PORT } else { DNS_PORT };
        let server = match provider.ip {
            std::net::IpAddr::V4(ip) => format!("{}:{}", ip, port),
            std::net::IpAddr::V6(ip) => format!("[{}]:{}", ip, port),
        };
        let mut config = Self::new(provider.name.clone(), server);
        if dot {
            config.dot = true;
            config.tls_key_pin = Some(provider.pin.clone());
        }
        config
    }

    /// Uses the first `nameserver` entry of a resolv.conf style file.
    pub fn from_resolv_conf(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(display.clone(), e.to_string()))?;

        let nameserver = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
            .find_map(|line| {
                let mut fields = line.split_whitespace();
                match fields.next() {
                    Some("nameserver") => fields.next(),
                    _ => None,
                }
            })
            .ok_or_else(|| {
                ConfigError::Validation(format!("no nameserver entry in {}", display))
            })?;

        // Drop a zone suffix like "fe80::1%eth0".
        let host = nameserver.split('%').next().unwrap_or(nameserver);
        let server = match host.parse::<std::net::IpAddr>() {
            Ok(std::net::IpAddr::V6(ip)) => format!("[{}]:{}", ip, DNS_PORT),
            Ok(ip) => format!("{}:{}", ip, DNS_PORT),
            Err(_) => {
                return Err(ConfigError::InvalidServer(format!(
                    "{} (from {})",
                    nameserver, display
                )))
            }
        };
        Ok(Self::new(display, server))
    }

    pub fn with_dot(mut self, pin: Option<String>) -> Self {
        self.dot = true;
        self.tls_key_pin = pin;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_no_ip4(mut self, no_ip4: bool) -> Self {
        self.no_ip4 = no_ip4;
        self
    }

    pub fn with_no_ip6(mut self, no_ip6: bool) -> Self {
        self.no_ip6 = no_ip6;
        self
    }

    pub fn with_no_udp(mut self, no_udp: bool) -> Self {
        self.no_udp = no_udp;
        self
    }

    pub fn with_no_tcp(mut self, no_tcp: bool) -> Self {
        self.no_tcp = no_tcp;
        self
    }

    pub fn udp_disabled(&self) -> bool {
        self.dot || self.no_udp
    }

    pub fn tcp_disabled(&self) -> bool {
        self.dot || self.no_tcp
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.server
        } else {
            &self.name
        }
    }

    pub fn ip_family(&self) -> Result<IpFamily, ConfigError> {
        match (self.no_ip4, self.no_ip6) {
            (true, true) => Err(ConfigError::IpFamiliesDisabled {
                server: self.server.clone(),
            }),
            (true, false) => Ok(IpFamily::V6),
            (false, true) => Ok(IpFamily::V4),
            (false, false) => Ok(IpFamily::Any),
        }
    }

    /// Derives the transport: DoT forces TLS, otherwise UDP unless disabled,
    /// then TCP.
    pub fn transport(&self) -> Result<Transport, ConfigError> {
        let kind = if self.dot {
            TransportKind::Tls
        } else if !self.no_udp {
            TransportKind::Udp
        } else if !self.no_tcp {
            TransportKind::Tcp
        } else {
            return Err(ConfigError::TransportsDisabled {
                server: self.server.clone(),
            });
        };
        Ok(Transport::new(kind, self.ip_family()?))
    }

    pub fn server_addr(&self) -> Result<UpstreamAddr, ConfigError> {
        let default_port = if self.dot { DOT_PORT } else { DNS_PORT };
        UpstreamAddr::parse_with_default_port(self.server.trim(), default_port)
            .map_err(|_| ConfigError::InvalidServer(self.server.clone()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.trim().is_empty() {
            return Err(ConfigError::InvalidServer("empty server".to_string()));
        }
        self.transport()?;
        self.server_addr()?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation(format!(
                "[{}] timeout cannot be 0",
                self.display_name()
            )));
        }
        if let Some(pin) = &self.tls_key_pin {
            if pin.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "[{}] empty TLS key pin",
                    self.display_name()
                )));
            }
        }
        Ok(())
    }
}
