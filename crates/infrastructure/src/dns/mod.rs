pub mod cache;
pub mod discovery;
pub mod forwarding;
pub mod resolver;
pub mod transport;

pub use cache::{AddressCache, ReadMostlyMap};
pub use discovery::discover;
pub use forwarding::{MessageBuilder, RecordTypeMapper, ResponseParser};
pub use resolver::ResolverBuilder;
pub use transport::{spki_pin, verify_pin, NetworkConnector, PinnedVerifier, TlsClientConfig};
