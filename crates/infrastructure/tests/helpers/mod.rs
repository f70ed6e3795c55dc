#![allow(dead_code)]
#![allow(unused_imports)]
pub mod dns_server_mock;
pub mod tls_server_mock;

pub use dns_server_mock::{build_mock_response, MockBehavior, MockDnsServer};
pub use tls_server_mock::MockTlsServer;
