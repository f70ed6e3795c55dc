use super::read_mostly::ReadMostlyMap;
use ferrous_resolv_application::ports::AddressCachePort;
use std::net::IpAddr;
use std::sync::Arc;

/// Resolved addresses keyed by query fingerprint. No expiry: entries live
/// until replaced or deleted.
#[derive(Default)]
pub struct AddressCache {
    map: ReadMostlyMap<u64, Arc<[IpAddr]>>,
}

impl AddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entry only if it still holds `old`, compared element by
    /// element.
    pub fn compare_and_swap(&self, key: u64, old: &[IpAddr], new: Arc<[IpAddr]>) -> bool {
        let old: Arc<[IpAddr]> = Arc::from(old);
        self.map.compare_and_swap(&key, &old, new)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl AddressCachePort for AddressCache {
    fn get(&self, key: u64) -> Option<Arc<[IpAddr]>> {
        self.map.get(&key)
    }

    fn add(&self, key: u64, addresses: Arc<[IpAddr]>) -> Option<Arc<[IpAddr]>> {
        self.map.add(key, addresses)
    }

    fn del(&self, key: u64) -> Option<Arc<[IpAddr]>> {
        self.map.del(&key)
    }
}
