//! DNS-over-TLS (RFC 7858)
//!
//! One fixed client profile: TLS 1.3 only, ChaCha20-Poly1305 only, X25519
//! only, no session resumption. Pinned configurations validate the chain
//! against the web-PKI roots and then check the key pin.

use super::pin::{pin_error, PinnedVerifier};
use super::stream::dial_tcp;
use ferrous_resolv_domain::{ConfigError, DomainError};
use rustls::client::{Resumption, WebPkiServerVerifier};
use rustls::crypto::aws_lc_rs::{self, cipher_suite, kx_group};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Client TLS configuration handed to DoT connections.
#[derive(Debug, Clone)]
pub struct TlsClientConfig {
    config: Arc<ClientConfig>,
    pin_verifier: bool,
}

impl TlsClientConfig {
    /// Fixed profile, web-PKI roots, pin checked on every handshake.
    pub fn pinned(resolver: &str, pin: &str) -> Result<Self, ConfigError> {
        Self::with_roots(webpki_root_store(), resolver, Some(pin))
    }

    /// Fixed profile, web-PKI roots, no pin.
    pub fn unpinned() -> Result<Self, ConfigError> {
        Self::with_roots(webpki_root_store(), "", None)
    }

    /// Fixed profile against a caller-supplied root store.
    pub fn with_roots(
        roots: RootCertStore,
        resolver: &str,
        pin: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let provider = Arc::new(fixed_profile_provider());

        let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_protocol_versions(&[&rustls::version::TLS13])
            .map_err(|e| ConfigError::Tls(format!("Unsupported TLS profile: {}", e)))?;

        let mut config = match pin {
            Some(pin) => {
                let webpki = WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider)
                    .build()
                    .map_err(|e| ConfigError::Tls(format!("Invalid root store: {}", e)))?;
                builder
                    .dangerous()
                    .with_custom_certificate_verifier(Arc::new(PinnedVerifier::new(
                        webpki, resolver, pin,
                    )))
                    .with_no_client_auth()
            }
            None => builder.with_root_certificates(roots).with_no_client_auth(),
        };
        config.resumption = Resumption::disabled();

        Ok(Self {
            config: Arc::new(config),
            pin_verifier: pin.is_some(),
        })
    }

    /// Wraps an externally built configuration. `pin_verifier` declares
    /// whether its certificate verifier checks a key pin.
    pub fn from_rustls(config: Arc<ClientConfig>, pin_verifier: bool) -> Self {
        Self {
            config,
            pin_verifier,
        }
    }

    pub fn has_pin_verifier(&self) -> bool {
        self.pin_verifier
    }

    pub fn client_config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config)
    }
}

pub fn fixed_profile_provider() -> CryptoProvider {
    CryptoProvider {
        cipher_suites: vec![cipher_suite::TLS13_CHACHA20_POLY1305_SHA256],
        kx_groups: vec![kx_group::X25519],
        ..aws_lc_rs::default_provider()
    }
}

fn webpki_root_store() -> RootCertStore {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    root_store
}

/// TCP connect plus handshake. `server_name` is the hostname when the
/// server was configured by name, otherwise the peer IP.
pub(crate) async fn connect_tls(
    tls: &TlsClientConfig,
    server_addr: SocketAddr,
    hostname: Option<&str>,
    timeout: Duration,
) -> Result<TlsStream<TcpStream>, DomainError> {
    let server_name = match hostname {
        Some(host) => ServerName::try_from(host.to_string()).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid TLS hostname '{}': {}", host, e))
        })?,
        None => ServerName::from(server_addr.ip()),
    };

    let tcp_stream = dial_tcp(server_addr, timeout).await?;
    let connector = TlsConnector::from(tls.client_config());

    let tls_stream = tokio::time::timeout(timeout, connector.connect(server_name, tcp_stream))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server_addr.to_string(),
        })?
        .map_err(|e| {
            pin_error(&e).unwrap_or_else(|| {
                DomainError::IoError(format!("TLS handshake failed with {}: {}", server_addr, e))
            })
        })?;

    debug!(server = %server_addr, "TLS connection established");
    Ok(tls_stream)
}
