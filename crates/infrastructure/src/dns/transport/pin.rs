//! Certificate pinning for DNS-over-TLS.
//!
//! A pin is the base64 (standard alphabet, padded) SHA-256 digest of the
//! peer certificate's DER-encoded SubjectPublicKeyInfo.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ferrous_resolv_domain::DomainError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, Error as TlsError, OtherError, SignatureScheme};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

/// Computes the pin of a DER certificate.
pub fn spki_pin(cert_der: &[u8]) -> Result<String, DomainError> {
    let (_, parsed) = x509_parser::parse_x509_certificate(cert_der)
        .map_err(|e| DomainError::InvalidDnsResponse(format!("Failed to parse certificate: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(parsed.public_key().raw);
    Ok(STANDARD.encode(hasher.finalize()))
}

/// Checks the first certificate of the presented chain against `pin`.
pub fn verify_pin(
    resolver: &str,
    pin: &str,
    certs: &[CertificateDer<'_>],
) -> Result<(), DomainError> {
    let mismatch = || DomainError::PinMismatch {
        resolver: resolver.to_string(),
    };

    let cert = certs.first().ok_or_else(|| {
        warn!(resolver = %resolver, "Peer presented no certificate");
        mismatch()
    })?;

    let presented = spki_pin(cert.as_ref()).map_err(|e| {
        warn!(resolver = %resolver, error = %e, "Unreadable peer certificate");
        mismatch()
    })?;

    if presented.as_bytes() != pin.as_bytes() {
        warn!(resolver = %resolver, presented = %presented, "TLS key pin mismatch");
        return Err(mismatch());
    }

    debug!(resolver = %resolver, "TLS key pin verified");
    Ok(())
}

/// Web-PKI chain validation followed by the pin check.
#[derive(Debug)]
pub struct PinnedVerifier {
    inner: Arc<WebPkiServerVerifier>,
    resolver: String,
    pin: String,
}

impl PinnedVerifier {
    pub fn new(
        inner: Arc<WebPkiServerVerifier>,
        resolver: impl Into<String>,
        pin: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            resolver: resolver.into(),
            pin: pin.into(),
        }
    }
}

impl ServerCertVerifier for PinnedVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        self.inner.verify_server_cert(
            end_entity,
            intermediates,
            server_name,
            ocsp_response,
            now,
        )?;

        verify_pin(&self.resolver, &self.pin, std::slice::from_ref(end_entity))
            .map_err(|e| TlsError::Other(OtherError(Arc::new(e))))?;

        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}

/// Recovers a [`DomainError::PinMismatch`] raised inside a handshake.
pub(crate) fn pin_error(error: &std::io::Error) -> Option<DomainError> {
    let tls_error = error.get_ref()?.downcast_ref::<TlsError>()?;
    match tls_error {
        TlsError::Other(OtherError(inner)) => inner.downcast_ref::<DomainError>().cloned(),
        _ => None,
    }
}
