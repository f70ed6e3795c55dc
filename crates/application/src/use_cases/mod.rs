pub mod exchange;
pub mod lookup;
pub mod query_executor;
pub mod reachability;
pub mod reverse_lookup;

pub use exchange::{ExchangeUseCase, RESULT_QUEUE_CAPACITY};
pub use lookup::LookupUseCase;
pub use query_executor::QueryExecutor;
pub use reachability::{CheckReachabilityUseCase, PROBE_NAME};
pub use reverse_lookup::ReverseLookupUseCase;
