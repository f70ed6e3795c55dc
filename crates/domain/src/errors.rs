use crate::config::ConfigError;
use crate::dns_record::RecordType;
use crate::transport::Transport;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("[reverse-lookup] not a valid IP4 address: {0}")]
    InvalidIpAddress(String),

    #[error("[reverse-lookup] invalid response from server {server}: {reason}")]
    InvalidReverseResponse { server: String, reason: String },

    #[error("Unsupported record type for address lookup: {0}")]
    UnsupportedRecordType(RecordType),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("{record_type} lookup failed: {server} {transport}: {reason}")]
    Lookup {
        record_type: RecordType,
        server: String,
        transport: Transport,
        reason: String,
    },

    #[error("{record_type} lookup failed: {server} {transport}: {rcode}")]
    ResponseCode {
        record_type: RecordType,
        server: String,
        transport: Transport,
        rcode: String,
    },

    #[error("{record_type} lookup failed: no answer for {domain}")]
    NoAnswer {
        domain: String,
        record_type: RecordType,
    },

    #[error("[tls keypin verification failed] {resolver}")]
    PinMismatch { resolver: String },

    #[error("No resolver configured")]
    NoResolver,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
