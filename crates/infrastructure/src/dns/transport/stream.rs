//! Stream connections (RFC 1035 §4.2.2, RFC 7858)
//!
//! TCP and TLS share the same framing: every message is preceded by its
//! length as a big-endian u16.

use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use async_trait::async_trait;
use ferrous_resolv_application::ports::{DnsConnection, DnsResponse};
use ferrous_resolv_domain::{DnsQuery, DomainError, Transport};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;
const READ_CHUNK_SIZE: usize = 4096;

/// A stream plus the bytes read from it that do not yet form a whole frame.
///
/// Reads go through `pending` so a cancelled exchange never loses part of a
/// frame; the next exchange on the connection picks up where it stopped.
struct FramedStream<S> {
    stream: S,
    pending: Vec<u8>,
    /// Set while a query is being written. Still set at the next exchange
    /// means the write was cut short and the outbound framing is lost.
    write_interrupted: bool,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, message: &[u8]) -> Result<(), DomainError> {
        self.write_interrupted = true;
        send_with_length_prefix(&mut self.stream, message).await?;
        self.write_interrupted = false;
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Vec<u8>, DomainError> {
        loop {
            if let Some(frame) = take_frame(&mut self.pending) {
                return Ok(frame);
            }
            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let n = self
                .stream
                .read(&mut chunk)
                .await
                .map_err(|e| DomainError::IoError(format!("Failed to read response: {}", e)))?;
            if n == 0 {
                return Err(DomainError::IoError(
                    "Connection closed before a full response was read".to_string(),
                ));
            }
            self.pending.extend_from_slice(&chunk[..n]);
        }
    }
}

pub struct StreamConnection<S> {
    stream: Mutex<FramedStream<S>>,
    server_addr: SocketAddr,
    transport: Transport,
    timeout: Duration,
}

impl<S> StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, server_addr: SocketAddr, transport: Transport, timeout: Duration) -> Self {
        Self {
            stream: Mutex::new(FramedStream {
                stream,
                pending: Vec::new(),
                write_interrupted: false,
            }),
            server_addr,
            transport,
            timeout,
        }
    }

    async fn round_trip(
        &self,
        framed: &mut FramedStream<S>,
        id: u16,
        message: &[u8],
    ) -> Result<DnsResponse, DomainError> {
        framed.send(message).await?;

        debug!(
            server = %self.server_addr,
            transport = %self.transport,
            message_len = message.len(),
            "Stream query sent"
        );

        loop {
            let frame = framed.next_frame().await?;
            let response = ResponseParser::parse(&frame)?;
            if response.id == id {
                debug!(
                    server = %self.server_addr,
                    transport = %self.transport,
                    response_len = frame.len(),
                    "Stream response received"
                );
                return Ok(response);
            }
            // a late answer to an exchange that already timed out
            debug!(
                server = %self.server_addr,
                expected_id = id,
                received_id = response.id,
                "Discarding stale stream response"
            );
        }
    }
}

#[async_trait]
impl<S> DnsConnection for StreamConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn transport(&self) -> Transport {
        self.transport
    }

    async fn exchange(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        let (id, message) = MessageBuilder::build_query(query)?;

        // Waiting for the connection does not count against this exchange.
        let mut framed = self.stream.lock().await;
        if framed.write_interrupted {
            return Err(DomainError::IoError(format!(
                "Connection to {} is unusable after an interrupted write",
                self.server_addr
            )));
        }

        tokio::time::timeout(self.timeout, self.round_trip(&mut *framed, id, &message))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
    }
}

/// Opens a TCP connection with `TCP_NODELAY`, bounded by `timeout`.
pub(crate) async fn dial_tcp(
    server_addr: SocketAddr,
    timeout: Duration,
) -> Result<TcpStream, DomainError> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(server_addr))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server_addr.to_string(),
        })?
        .map_err(|e| match e.kind() {
            ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
                server: server_addr.to_string(),
            },
            _ => DomainError::IoError(format!(
                "Failed to connect to TCP server {}: {}",
                server_addr, e
            )),
        })?;

    stream.set_nodelay(true).map_err(|e| {
        DomainError::IoError(format!(
            "Failed to set TCP_NODELAY on {}: {}",
            server_addr, e
        ))
    })?;

    Ok(stream)
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWrite + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::IoError(format!(
            "Message too large: {} bytes (max {})",
            message_bytes.len(),
            MAX_TCP_MESSAGE_SIZE
        ))
    })?;

    stream
        .write_all(&length.to_be_bytes())
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to write length prefix: {}", e)))?;
    stream
        .write_all(message_bytes)
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to write DNS message: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

/// Removes and returns the first complete length-prefixed frame in `buf`.
fn take_frame(buf: &mut Vec<u8>) -> Option<Vec<u8>> {
    if buf.len() < 2 {
        return None;
    }
    let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    if buf.len() < 2 + len {
        return None;
    }
    let frame = buf[2..2 + len].to_vec();
    buf.drain(..2 + len);
    Some(frame)
}
