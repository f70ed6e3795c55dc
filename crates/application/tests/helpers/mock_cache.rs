use ferrous_resolv_application::ports::AddressCachePort;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockAddressCache {
    entries: Mutex<HashMap<u64, Arc<[IpAddr]>>>,
}

impl MockAddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl AddressCachePort for MockAddressCache {
    fn get(&self, key: u64) -> Option<Arc<[IpAddr]>> {
        self.entries.lock().unwrap().get(&key).cloned()
    }

    fn add(&self, key: u64, addresses: Arc<[IpAddr]>) -> Option<Arc<[IpAddr]>> {
        self.entries.lock().unwrap().insert(key, addresses)
    }

    fn del(&self, key: u64) -> Option<Arc<[IpAddr]>> {
        self.entries.lock().unwrap().remove(&key)
    }
}
