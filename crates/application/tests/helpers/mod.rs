#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_cache;
pub mod mock_dns;

pub use mock_cache::MockAddressCache;
pub use mock_dns::{record, MockConnector, TEST_SERVER};
