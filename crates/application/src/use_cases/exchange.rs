use super::query_executor::QueryExecutor;
use crate::ports::DnsResponse;
use ferrous_resolv_domain::{Answer, DnsQuery, DomainError, RecordType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Capacity of the per-type result queue.
pub const RESULT_QUEUE_CAPACITY: usize = 25;

#[derive(Debug)]
struct TypeOutcome {
    record_type: RecordType,
    raw: Option<String>,
    summary: Option<String>,
}

/// Queries many record types for one name over a single shared connection.
pub struct ExchangeUseCase {
    executor: Arc<QueryExecutor>,
}

impl ExchangeUseCase {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Fans out one task per queryable type and collects their outcomes.
    ///
    /// Per-type failures become `FAIL` summary lines (a response that came
    /// back with an error code still contributes its raw text); a connection
    /// failure yields a single entry keyed `NONE`. The call itself does not
    /// fail.
    pub async fn execute(
        &self,
        name: &str,
        raw: bool,
        summary: bool,
        record_types: &[RecordType],
    ) -> Result<Answer, DomainError> {
        let (tx, mut rx) = mpsc::channel::<TypeOutcome>(RESULT_QUEUE_CAPACITY);
        let name: Arc<str> = Arc::from(name);

        match self.executor.connect().await {
            Err(e) => {
                warn!(
                    server = %self.executor.server(),
                    transport = %self.executor.transport(),
                    error = %e,
                    "Connection failed, skipping exchange"
                );
                let outcome = TypeOutcome {
                    record_type: RecordType::NONE,
                    raw: None,
                    summary: Some(fail_line(&e)),
                };
                if tx.send(outcome).await.is_err() {
                    debug!("Result queue closed before connection failure was recorded");
                }
            }
            Ok(conn) => {
                let mut spawned = 0usize;
                for &record_type in record_types {
                    if !record_type.is_queryable() {
                        continue;
                    }
                    spawned += 1;

                    let tx = tx.clone();
                    let conn = Arc::clone(&conn);
                    let executor = Arc::clone(&self.executor);
                    let query = DnsQuery::new(Arc::clone(&name), record_type);

                    tokio::spawn(async move {
                        let outcome = match executor.fetch_via(conn.as_ref(), &query).await {
                            Ok((transport, response)) => {
                                match executor.check_response(&query, transport, &response) {
                                    Ok(()) => answered(record_type, &response, raw, summary),
                                    Err(e) => Some(TypeOutcome {
                                        record_type,
                                        raw: raw.then(|| response.text.clone()),
                                        summary: Some(fail_line(&e)),
                                    }),
                                }
                            }
                            Err(e) => {
                                debug!(
                                    domain = %query.domain,
                                    record_type = %record_type,
                                    error = %e,
                                    "Record type query failed"
                                );
                                Some(TypeOutcome {
                                    record_type,
                                    raw: None,
                                    summary: Some(fail_line(&e)),
                                })
                            }
                        };
                        if let Some(outcome) = outcome {
                            let _ = tx.send(outcome).await;
                        }
                    });
                }
                debug!(domain = %name, tasks = spawned, "Dispatched record type queries");
            }
        }

        // The queue closes once every task has dropped its sender.
        drop(tx);

        let mut raw_map = HashMap::with_capacity(record_types.len());
        let mut summary_map = HashMap::with_capacity(record_types.len());
        while let Some(outcome) = rx.recv().await {
            if let Some(text) = outcome.raw {
                raw_map.insert(outcome.record_type, text);
            }
            if let Some(text) = outcome.summary {
                summary_map.insert(outcome.record_type, text);
            }
        }

        Ok(Answer {
            raw: raw_map,
            summary: summary_map,
        })
    }
}

/// Outcome of a successful query, or `None` when there is nothing to report.
fn answered(
    record_type: RecordType,
    response: &DnsResponse,
    raw: bool,
    summary: bool,
) -> Option<TypeOutcome> {
    if response.answers.is_empty() {
        return None;
    }
    let raw_text = raw.then(|| response.text.clone());
    let summary_text = if summary {
        let lines: String = response
            .answers_of(record_type)
            .map(|r| format!("DNS {}\t{}\n", record_type, r.line()))
            .collect();
        (!lines.is_empty()).then_some(lines)
    } else {
        None
    };
    if raw_text.is_none() && summary_text.is_none() {
        return None;
    }
    Some(TypeOutcome {
        record_type,
        raw: raw_text,
        summary: summary_text,
    })
}

fn fail_line(e: &DomainError) -> String {
    format!("FAIL {}\n", e)
}
