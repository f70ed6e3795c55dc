use super::query_executor::QueryExecutor;
use crate::services::ReachabilityMemo;
use ferrous_resolv_domain::{DnsQuery, DomainError, RecordType};
use std::sync::Arc;
use tracing::debug;

/// Name probed to test a server. Any NOERROR answer counts.
pub const PROBE_NAME: &str = "in-addr.arpa";

pub struct CheckReachabilityUseCase {
    executor: Arc<QueryExecutor>,
    memo: Arc<ReachabilityMemo>,
}

impl CheckReachabilityUseCase {
    pub fn new(executor: Arc<QueryExecutor>, memo: Arc<ReachabilityMemo>) -> Self {
        Self { executor, memo }
    }

    /// Only encrypted resolvers are remembered as reachable; plain servers
    /// are probed on every call.
    pub async fn execute(&self) -> Result<(), DomainError> {
        let server = self.executor.server();
        if self.memo.is_known_reachable(server) {
            debug!(server = %server, "Reachability served from memo");
            return Ok(());
        }

        let query = DnsQuery::new(PROBE_NAME, RecordType::A);
        self.executor.resolve(&query).await?;

        let encrypted = self.executor.transport().is_encrypted();
        self.memo.record(server, encrypted);
        debug!(server = %server, encrypted, "Server reachable");
        Ok(())
    }
}
