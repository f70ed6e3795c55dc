//! UDP connection (RFC 1035 §4.2.1)
//!
//! A connected socket shared by all exchanges of one resolution. Exchanges
//! are serialized; datagrams whose id does not match the outstanding query
//! are dropped. A truncated response is returned as-is; the executor decides
//! whether to retry over TCP.

use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use async_trait::async_trait;
use ferrous_resolv_application::ports::{DnsConnection, DnsResponse};
use ferrous_resolv_domain::{DnsQuery, DomainError, Transport};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct UdpConnection {
    socket: UdpSocket,
    server_addr: SocketAddr,
    transport: Transport,
    timeout: Duration,
    exchange_lock: Mutex<()>,
}

impl UdpConnection {
    pub async fn connect(
        server_addr: SocketAddr,
        transport: Transport,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let bind_addr: SocketAddr = if server_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        socket.connect(server_addr).await.map_err(|e| {
            DomainError::IoError(format!(
                "Failed to connect UDP socket to {}: {}",
                server_addr, e
            ))
        })?;

        debug!(server = %server_addr, transport = %transport, "UDP connection ready");

        Ok(Self {
            socket,
            server_addr,
            transport,
            timeout,
            exchange_lock: Mutex::new(()),
        })
    }

    async fn send_and_receive(&self, id: u16, message: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bytes_sent = self.socket.send(message).await.map_err(|e| {
            DomainError::IoError(format!(
                "Failed to send UDP query to {}: {}",
                self.server_addr, e
            ))
        })?;

        debug!(server = %self.server_addr, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let bytes_received = self.socket.recv(&mut recv_buf).await.map_err(|e| {
                DomainError::IoError(format!(
                    "Failed to receive UDP response from {}: {}",
                    self.server_addr, e
                ))
            })?;

            if bytes_received < 2 || u16::from_be_bytes([recv_buf[0], recv_buf[1]]) != id {
                debug!(
                    server = %self.server_addr,
                    bytes_received = bytes_received,
                    "Dropping UDP datagram with mismatched id"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);
            debug!(
                server = %self.server_addr,
                bytes_received = bytes_received,
                "UDP response received"
            );
            return Ok(recv_buf);
        }
    }
}

#[async_trait]
impl DnsConnection for UdpConnection {
    fn transport(&self) -> Transport {
        self.transport
    }

    async fn exchange(&self, query: &DnsQuery) -> Result<DnsResponse, DomainError> {
        let (id, message) = MessageBuilder::build_query(query)?;

        let _guard = self.exchange_lock.lock().await;
        let bytes = tokio::time::timeout(self.timeout, self.send_and_receive(id, &message))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })??;

        ResponseParser::parse(&bytes)
    }
}
