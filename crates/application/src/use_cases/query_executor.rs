use crate::ports::{DnsConnection, DnsConnector, DnsResponse};
use ferrous_resolv_domain::{DnsQuery, DomainError, Transport};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs a single query against the configured server, with one stream retry
/// for failed or truncated datagram exchanges.
pub struct QueryExecutor {
    connector: Arc<dyn DnsConnector>,
    transport: Transport,
    tcp_disabled: bool,
}

impl QueryExecutor {
    pub fn new(connector: Arc<dyn DnsConnector>, transport: Transport, tcp_disabled: bool) -> Self {
        Self {
            connector,
            transport,
            tcp_disabled,
        }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn server(&self) -> &str {
        self.connector.server()
    }

    /// Opens a connection with the configured transport.
    pub async fn connect(&self) -> Result<Arc<dyn DnsConnection>, DomainError> {
        self.connector.connect(self.transport).await
    }

    /// Connects and resolves one query.
    pub async fn resolve(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        let conn = self
            .connect()
            .await
            .map_err(|e| self.lookup_error(query, self.transport, e))?;
        self.resolve_via(conn.as_ref(), query).await
    }

    /// Resolves one query over an existing connection.
    pub async fn resolve_via(
        &self,
        conn: &dyn DnsConnection,
        query: &DnsQuery,
    ) -> Result<DnsResponse, DomainError> {
        let (transport, response) = self.fetch_via(conn, query).await?;
        self.check_response(query, transport, &response)?;
        Ok(response)
    }

    /// Runs the exchange (and any stream retry) without judging the response
    /// code. Returns the transport that produced the response.
    pub async fn fetch_via(
        &self,
        conn: &dyn DnsConnection,
        query: &DnsQuery,
    ) -> Result<(Transport, DnsResponse), DomainError> {
        let transport = conn.transport();

        match conn.exchange(query).await {
            Ok(response) if response.truncated && self.can_retry(transport) => {
                debug!(
                    server = %self.server(),
                    domain = %query.domain,
                    record_type = %query.record_type,
                    "Truncated datagram response, retrying over TCP"
                );
                self.fetch_over_stream(query, transport).await
            }
            Ok(response) => Ok((transport, response)),
            Err(e) if self.can_retry(transport) => {
                warn!(
                    server = %self.server(),
                    domain = %query.domain,
                    record_type = %query.record_type,
                    error = %e,
                    "UDP exchange failed, retrying over TCP"
                );
                self.fetch_over_stream(query, transport).await
            }
            Err(e) => Err(self.lookup_error(query, transport, e)),
        }
    }

    fn can_retry(&self, transport: Transport) -> bool {
        transport.is_datagram() && !self.tcp_disabled
    }

    async fn fetch_over_stream(
        &self,
        query: &DnsQuery,
        failed: Transport,
    ) -> Result<(Transport, DnsResponse), DomainError> {
        let fallback = failed.stream_fallback();
        let conn = self
            .connector
            .connect(fallback)
            .await
            .map_err(|e| self.lookup_error(query, fallback, e))?;

        let response = conn
            .exchange(query)
            .await
            .map_err(|e| self.lookup_error(query, fallback, e))?;

        Ok((fallback, response))
    }

    /// A non-success response code is an error.
    pub fn check_response(
        &self,
        query: &DnsQuery,
        transport: Transport,
        response: &DnsResponse,
    ) -> Result<(), DomainError> {
        if response.is_success() {
            return Ok(());
        }
        debug!(
            server = %self.server(),
            domain = %query.domain,
            record_type = %query.record_type,
            rcode = response.rcode_name(),
            "Non-success response code"
        );
        Err(DomainError::ResponseCode {
            record_type: query.record_type,
            server: self.server().to_string(),
            transport,
            rcode: response.rcode_name().to_string(),
        })
    }

    fn lookup_error(&self, query: &DnsQuery, transport: Transport, e: DomainError) -> DomainError {
        match e {
            DomainError::PinMismatch { .. }
            | DomainError::Config(_)
            | DomainError::Lookup { .. }
            | DomainError::ResponseCode { .. } => e,
            other => DomainError::Lookup {
                record_type: query.record_type,
                server: self.server().to_string(),
                transport,
                reason: other.to_string(),
            },
        }
    }
}
