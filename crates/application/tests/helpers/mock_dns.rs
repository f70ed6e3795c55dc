use async_trait::async_trait;
use ferrous_resolv_application::ports::{DnsConnection, DnsConnector, DnsResponse, ResponseRecord};
use ferrous_resolv_domain::{DnsQuery, DomainError, RecordType, Transport, TransportKind};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_SERVER: &str = "192.0.2.53:53";

pub fn record(name: &str, record_type: RecordType, rdata: &str) -> ResponseRecord {
    ResponseRecord::new(format!("{}.", name.trim_end_matches('.')), 300, record_type, rdata)
}

fn key(name: &str, record_type: RecordType) -> (String, RecordType) {
    (name.trim_end_matches('.').to_ascii_lowercase(), record_type)
}

#[derive(Default)]
struct MockState {
    responses: Mutex<HashMap<(String, RecordType), DnsResponse>>,
    query_errors: Mutex<HashMap<(String, RecordType), DomainError>>,
    failing_connect: Mutex<HashSet<TransportKind>>,
    failing_exchange: Mutex<HashSet<TransportKind>>,
    truncate_datagrams: AtomicBool,
    connects: Mutex<Vec<Transport>>,
    queries: Mutex<Vec<(Transport, String, RecordType)>>,
}

/// Scripted connector: answers come from a table keyed by (name, type),
/// unknown queries get an empty NOERROR response.
#[derive(Clone)]
pub struct MockConnector {
    server: String,
    state: Arc<MockState>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::with_server(TEST_SERVER)
    }

    pub fn with_server(server: &str) -> Self {
        Self {
            server: server.to_string(),
            state: Arc::new(MockState::default()),
        }
    }

    pub fn set_answers(&self, name: &str, record_type: RecordType, answers: Vec<ResponseRecord>) {
        let text = answers
            .iter()
            .map(|r| r.line())
            .collect::<Vec<_>>()
            .join("\n");
        self.set_response(
            name,
            record_type,
            DnsResponse {
                answers,
                text: format!(";; ANSWER SECTION:\n{}", text),
                ..Default::default()
            },
        );
    }

    pub fn set_response(&self, name: &str, record_type: RecordType, response: DnsResponse) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(key(name, record_type), response);
    }

    pub fn set_rcode(&self, name: &str, record_type: RecordType, rcode: u16) {
        self.set_response(
            name,
            record_type,
            DnsResponse {
                rcode,
                ..Default::default()
            },
        );
    }

    /// Every exchange of this query fails, whatever the transport.
    pub fn fail_query(&self, name: &str, record_type: RecordType) {
        self.state.query_errors.lock().unwrap().insert(
            key(name, record_type),
            DomainError::IoError(format!("mock failure for {} {}", name, record_type)),
        );
    }

    pub fn fail_connect(&self, kind: TransportKind) {
        self.state.failing_connect.lock().unwrap().insert(kind);
    }

    pub fn fail_exchange(&self, kind: TransportKind) {
        self.state.failing_exchange.lock().unwrap().insert(kind);
    }

    pub fn truncate_datagrams(&self) {
        self.state.truncate_datagrams.store(true, Ordering::SeqCst);
    }

    pub fn connects(&self) -> Vec<Transport> {
        self.state.connects.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<(Transport, String, RecordType)> {
        self.state.queries.lock().unwrap().clone()
    }

    pub fn queried_types(&self) -> Vec<RecordType> {
        let mut types: Vec<RecordType> = self.queries().into_iter().map(|(_, _, t)| t).collect();
        types.sort();
        types
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsConnector for MockConnector {
    fn server(&self) -> &str {
        &self.server
    }

    async fn connect(&self, transport: Transport) -> Result<Arc<dyn DnsConnection>, DomainError> {
        self.state.connects.lock().unwrap().push(transport);
        if self
            .state
            .failing_connect
            .lock()
            .unwrap()
            .contains(&transport.kind)
        {
            return Err(DomainError::TransportConnectionRefused {
                server: self.server.clone(),
            });
        }
        Ok(Arc::new(MockConnection {
            transport,
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockConnection {
    transport: Transport,
    state: Arc<MockState>,
}

#[async_trait]
impl DnsConnection for MockConnection {
    fn transport(&self) -> Transport {
        self.transport
    }

    async fn exchange(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        self.state.queries.lock().unwrap().push((
            self.transport,
            query.domain.to_string(),
            query.record_type,
        ));

        if self
            .state
            .failing_exchange
            .lock()
            .unwrap()
            .contains(&self.transport.kind)
        {
            return Err(DomainError::IoError("mock exchange failure".to_string()));
        }

        let k = key(&query.domain, query.record_type);
        if let Some(e) = self.state.query_errors.lock().unwrap().get(&k) {
            return Err(e.clone());
        }

        let mut response = self
            .state
            .responses
            .lock()
            .unwrap()
            .get(&k)
            .cloned()
            .unwrap_or_default();

        if self.transport.is_datagram() && self.state.truncate_datagrams.load(Ordering::SeqCst) {
            response.truncated = true;
        }
        Ok(response)
    }
}
