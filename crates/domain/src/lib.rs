//! Ferrous Resolv Domain Layer
pub mod answer;
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod transport;

pub use answer::Answer;
pub use config::{CliOverrides, Config, ConfigError, LogFormat, Provider, ResolverConfig};
pub use dns_query::DnsQuery;
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use transport::{IpFamily, Transport, TransportKind, UpstreamAddr, DNS_PORT, DOT_PORT};
