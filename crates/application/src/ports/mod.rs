mod address_cache;
mod dns_connection;

pub use address_cache::AddressCachePort;
pub use dns_connection::{DnsConnection, DnsConnector, DnsResponse, ResponseRecord};

// Re-export for convenience
pub use ferrous_resolv_domain::DnsQuery;
