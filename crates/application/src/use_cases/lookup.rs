use super::query_executor::QueryExecutor;
use ferrous_resolv_domain::{DnsQuery, DomainError, RecordType};
use futures::future::join_all;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

pub struct LookupUseCase {
    executor: Arc<QueryExecutor>,
}

impl LookupUseCase {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Answer lines whose record type matches the query.
    pub async fn lines(&self, name: &str, record_type: RecordType) -> Result<Vec<String>, DomainError> {
        let query = DnsQuery::new(name, record_type);
        let response = self.executor.resolve(&query).await?;

        let lines: Vec<String> = response
            .answers_of(record_type)
            .map(|record| record.line())
            .collect();

        if lines.is_empty() {
            return Err(no_answer(name, record_type));
        }
        Ok(lines)
    }

    /// Addresses of exactly `record_type`, which must be A or AAAA.
    pub async fn addresses(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<IpAddr>, DomainError> {
        if !record_type.is_address() {
            return Err(DomainError::UnsupportedRecordType(record_type));
        }

        let query = DnsQuery::new(name, record_type);
        let response = self.executor.resolve(&query).await?;

        let addresses: Vec<IpAddr> = response
            .answers_of(record_type)
            .filter_map(|record| record.address())
            .collect();

        if addresses.is_empty() {
            return Err(no_answer(name, record_type));
        }
        debug!(domain = %name, record_type = %record_type, count = addresses.len(), "Addresses resolved");
        Ok(addresses)
    }

    /// Runs [`addresses`](Self::addresses) for every type concurrently.
    ///
    /// Fails only when every type failed, with the last error in `record_types`
    /// order.
    pub async fn addresses_multi(
        &self,
        name: &str,
        record_types: &[RecordType],
    ) -> Result<Vec<IpAddr>, DomainError> {
        let results = join_all(
            record_types
                .iter()
                .map(|&record_type| self.addresses(name, record_type)),
        )
        .await;

        collect_addresses(results)
    }
}

pub(crate) fn collect_addresses(
    results: Vec<Result<Vec<IpAddr>, DomainError>>,
) -> Result<Vec<IpAddr>, DomainError> {
    let total = results.len();
    let mut failures = 0usize;
    let mut last_error = None;
    let mut all = Vec::new();

    for result in results {
        match result {
            Ok(addresses) => all.extend(addresses),
            Err(e) => {
                failures += 1;
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if failures == total => Err(e),
        _ => Ok(all),
    }
}

fn no_answer(name: &str, record_type: RecordType) -> DomainError {
    DomainError::NoAnswer {
        domain: name.to_string(),
        record_type,
    }
}
