use async_trait::async_trait;
use ferrous_resolv_domain::{DnsQuery, DomainError, RecordType, Transport};
use std::net::IpAddr;
use std::sync::Arc;

/// One answer-section record in presentation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub name: String,
    pub ttl: u32,
    pub class: String,
    pub record_type: RecordType,
    pub rdata: String,
}

impl ResponseRecord {
    pub fn new(
        name: impl Into<String>,
        ttl: u32,
        record_type: RecordType,
        rdata: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ttl,
            class: "IN".to_string(),
            record_type,
            rdata: rdata.into(),
        }
    }

    /// The address carried by an A or AAAA record.
    pub fn address(&self) -> Option<IpAddr> {
        if !self.record_type.is_address() {
            return None;
        }
        self.rdata.parse().ok()
    }

    /// `name\tttl\tclass\ttype\trdata`
    pub fn line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.class, self.record_type, self.rdata
        )
    }
}

/// A decoded response, detached from the wire library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsResponse {
    pub id: u16,
    pub rcode: u16,
    pub truncated: bool,
    pub answers: Vec<ResponseRecord>,
    /// Full message rendered as text.
    pub text: String,
}

impl DnsResponse {
    pub fn is_success(&self) -> bool {
        self.rcode == 0
    }

    pub fn rcode_name(&self) -> &'static str {
        match self.rcode {
            0 => "NOERROR",
            1 => "FORMERR",
            2 => "SERVFAIL",
            3 => "NXDOMAIN",
            4 => "NOTIMP",
            5 => "REFUSED",
            _ => "UNKNOWN",
        }
    }

    pub fn answers_of(&self, record_type: RecordType) -> impl Iterator<Item = &ResponseRecord> {
        self.answers
            .iter()
            .filter(move |r| r.record_type == record_type)
    }
}

/// An open connection to one server. Exchanges may be issued concurrently;
/// implementations serialize them internally.
#[async_trait]
pub trait DnsConnection: Send + Sync {
    fn transport(&self) -> Transport;

    async fn exchange(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError>;
}

/// Opens connections to the configured server.
#[async_trait]
pub trait DnsConnector: Send + Sync {
    fn server(&self) -> &str;

    async fn connect(&self, transport: Transport) -> Result<Arc<dyn DnsConnection>, DomainError>;
}
