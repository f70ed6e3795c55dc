//! Ferrous Resolv Infrastructure Layer
pub mod dns;

pub use dns::{
    discover, AddressCache, NetworkConnector, ReadMostlyMap, ResolverBuilder, TlsClientConfig,
};
