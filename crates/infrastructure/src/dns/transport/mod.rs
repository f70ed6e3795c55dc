pub mod pin;
pub mod stream;
pub mod tls;
pub mod udp;

pub use pin::{spki_pin, verify_pin, PinnedVerifier};
pub use stream::StreamConnection;
pub use tls::{fixed_profile_provider, TlsClientConfig};
pub use udp::UdpConnection;

use async_trait::async_trait;
use ferrous_resolv_application::ports::{DnsConnection, DnsConnector};
use ferrous_resolv_domain::{
    ConfigError, DomainError, IpFamily, ResolverConfig, Transport, TransportKind, UpstreamAddr,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Opens UDP, TCP and TLS connections to one configured server.
pub struct NetworkConnector {
    upstream: UpstreamAddr,
    server: String,
    timeout: Duration,
    tls: Option<TlsClientConfig>,
}

impl NetworkConnector {
    pub fn new(upstream: UpstreamAddr, timeout: Duration) -> Self {
        Self {
            server: upstream.to_string(),
            upstream,
            timeout,
            tls: None,
        }
    }

    pub fn with_tls(mut self, tls: TlsClientConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn from_config(
        config: &ResolverConfig,
        tls: Option<TlsClientConfig>,
    ) -> Result<Self, ConfigError> {
        let connector = Self::new(config.server_addr()?, config.timeout());
        Ok(match tls {
            Some(tls) => connector.with_tls(tls),
            None => connector,
        })
    }

    /// First address of the allowed family. Hostnames are resolved through
    /// the system resolver on every call.
    async fn resolve(&self, family: IpFamily) -> Result<SocketAddr, DomainError> {
        let candidates: Vec<SocketAddr> = match &self.upstream {
            UpstreamAddr::Resolved(addr) => vec![*addr],
            UpstreamAddr::Unresolved { hostname, port } => {
                tokio::net::lookup_host((hostname.as_ref(), *port))
                    .await
                    .map_err(|e| {
                        DomainError::IoError(format!("Failed to resolve {}: {}", self.server, e))
                    })?
                    .collect()
            }
        };

        candidates
            .into_iter()
            .find(|addr| family.allows(&addr.ip()))
            .ok_or_else(|| {
                DomainError::IoError(format!(
                    "No usable address for {} (family {:?})",
                    self.server, family
                ))
            })
    }

    fn tls_hostname(&self) -> Option<&str> {
        match &self.upstream {
            UpstreamAddr::Unresolved { hostname, .. } => Some(hostname.as_ref()),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

#[async_trait]
impl DnsConnector for NetworkConnector {
    fn server(&self) -> &str {
        &self.server
    }

    async fn connect(&self, transport: Transport) -> Result<Arc<dyn DnsConnection>, DomainError> {
        let addr = self.resolve(transport.family).await?;
        debug!(server = %addr, transport = %transport, "Opening connection");

        let connection: Arc<dyn DnsConnection> = match transport.kind {
            TransportKind::Udp => {
                Arc::new(UdpConnection::connect(addr, transport, self.timeout).await?)
            }
            TransportKind::Tcp => {
                let stream = stream::dial_tcp(addr, self.timeout).await?;
                Arc::new(StreamConnection::new(stream, addr, transport, self.timeout))
            }
            TransportKind::Tls => {
                let tls = self.tls.as_ref().ok_or_else(|| {
                    DomainError::Config(ConfigError::Tls(format!(
                        "No TLS configuration for {}",
                        self.server
                    )))
                })?;
                let stream =
                    tls::connect_tls(tls, addr, self.tls_hostname(), self.timeout).await?;
                Arc::new(StreamConnection::new(stream, addr, transport, self.timeout))
            }
        };
        Ok(connection)
    }
}
