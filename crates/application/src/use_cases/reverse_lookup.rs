use super::query_executor::QueryExecutor;
use ferrous_resolv_domain::{DnsQuery, DomainError, RecordType};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tracing::debug;

pub struct ReverseLookupUseCase {
    executor: Arc<QueryExecutor>,
}

impl ReverseLookupUseCase {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Returns the PTR target of a valid, specified IPv4 address.
    pub async fn execute(&self, ip: IpAddr) -> Result<String, DomainError> {
        let ip4 = validate_ipv4(ip)?;
        let query = DnsQuery::reverse_ipv4(ip4);
        debug!(ip = %ip4, query = %query.domain, "Reverse lookup");

        let response = self.executor.resolve(&query).await?;

        let target = response
            .answers
            .into_iter()
            .find(|record| record.record_type == RecordType::PTR)
            .map(|record| record.rdata);

        target.ok_or_else(|| DomainError::InvalidReverseResponse {
            server: self.executor.server().to_string(),
            reason: format!("no PTR record for {}", query.domain),
        })
    }
}

fn validate_ipv4(ip: IpAddr) -> Result<Ipv4Addr, DomainError> {
    match ip {
        IpAddr::V4(v4) if !v4.is_unspecified() => Ok(v4),
        other => Err(DomainError::InvalidIpAddress(other.to_string())),
    }
}
