use std::net::IpAddr;
use std::sync::Arc;

/// Address cache keyed by an opaque query fingerprint.
pub trait AddressCachePort: Send + Sync {
    fn get(&self, key: u64) -> Option<Arc<[IpAddr]>>;

    /// Insert or replace; returns the previous value.
    fn add(&self, key: u64, addresses: Arc<[IpAddr]>) -> Option<Arc<[IpAddr]>>;

    fn del(&self, key: u64) -> Option<Arc<[IpAddr]>>;
}
