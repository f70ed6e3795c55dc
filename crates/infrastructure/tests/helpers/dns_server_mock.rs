use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub const MOCK_IPV4: [u8; 4] = [93, 184, 216, 34];
pub const MOCK_IPV6: [u8; 16] = [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01];
pub const MOCK_PTR: &str = "dns.google.";
pub const MOCK_TTL: u32 = 60;

#[derive(Debug, Clone, Copy, Default)]
pub struct MockBehavior {
    /// Answer UDP queries with TC set and no records.
    pub truncate_udp: bool,
    /// Do not listen on UDP at all.
    pub no_udp: bool,
    pub rcode: u8,
}

/// DNS server on 127.0.0.1 answering over UDP and TCP on one port.
///
/// A queries get `93.184.216.34`, AAAA `2001:db8::1`, PTR `dns.google.`;
/// every other type gets an empty NOERROR answer.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Vec<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> std::io::Result<Self> {
        // Pair a UDP and a TCP socket on the same free port.
        let mut last_err = None;
        for _ in 0..20 {
            let udp = UdpSocket::bind("127.0.0.1:0").await?;
            let addr = udp.local_addr()?;
            match TcpListener::bind(addr).await {
                Ok(tcp) => return Ok(Self::spawn(udp, tcp, behavior)),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| std::io::Error::other("no free port")))
    }

    fn spawn(udp: UdpSocket, tcp: TcpListener, behavior: MockBehavior) -> Self {
        let addr = tcp.local_addr().unwrap();
        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let mut shutdown_tx = Vec::new();

        if behavior.no_udp {
            drop(udp);
        } else {
            let (tx, mut rx) = oneshot::channel::<()>();
            shutdown_tx.push(tx);
            let counter = Arc::clone(&udp_queries);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 512];
                loop {
                    tokio::select! {
                        _ = &mut rx => break,
                        result = udp.recv_from(&mut buf) => {
                            if let Ok((len, peer)) = result {
                                counter.fetch_add(1, Ordering::SeqCst);
                                let response = build_mock_response(
                                    &buf[..len],
                                    behavior.rcode,
                                    behavior.truncate_udp,
                                );
                                let _ = udp.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            });
        }

        let (tx, mut rx) = oneshot::channel::<()>();
        shutdown_tx.push(tx);
        let counter = Arc::clone(&tcp_queries);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    result = tcp.accept() => {
                        if let Ok((stream, _)) = result {
                            let counter = Arc::clone(&counter);
                            tokio::spawn(serve_stream(stream, behavior.rcode, counter));
                        }
                    }
                }
            }
        });

        Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        for tx in self.shutdown_tx.drain(..) {
            let _ = tx.send(());
        }
    }
}

/// Answers length-prefixed queries until the peer closes the stream.
pub async fn serve_stream<S>(mut stream: S, rcode: u8, counter: Arc<AtomicUsize>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let mut len_buf = [0u8; 2];
        if stream.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        if stream.read_exact(&mut query).await.is_err() {
            return;
        }
        counter.fetch_add(1, Ordering::SeqCst);

        let response = build_mock_response(&query, rcode, false);
        let mut framed = (response.len() as u16).to_be_bytes().to_vec();
        framed.extend_from_slice(&response);
        if stream.write_all(&framed).await.is_err() {
            return;
        }
    }
}

fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.trim_end_matches('.').split('.') {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// Echoes the question and appends one answer matching the query type.
pub fn build_mock_response(query: &[u8], rcode: u8, truncated: bool) -> Vec<u8> {
    if query.len() < 12 {
        return vec![];
    }

    // walk the question name to find the type
    let mut pos = 12;
    while pos < query.len() && query[pos] != 0 {
        pos += query[pos] as usize + 1;
    }
    let question_end = pos + 5;
    if question_end > query.len() {
        return vec![];
    }
    let qtype = u16::from_be_bytes([query[pos + 1], query[pos + 2]]);

    let rdata: Option<(u16, Vec<u8>)> = if truncated || rcode != 0 {
        None
    } else {
        match qtype {
            1 => Some((1, MOCK_IPV4.to_vec())),
            28 => Some((28, MOCK_IPV6.to_vec())),
            12 => Some((12, encode_name(MOCK_PTR))),
            _ => None,
        }
    };

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&query[0..2]);
    response.push(0x81 | if truncated { 0x02 } else { 0x00 });
    response.push(0x80 | (rcode & 0x0F));
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&[0x00, u8::from(rdata.is_some())]);
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    response.extend_from_slice(&query[12..question_end]);

    if let Some((rtype, data)) = rdata {
        response.extend_from_slice(&[0xc0, 0x0c]);
        response.extend_from_slice(&rtype.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&MOCK_TTL.to_be_bytes());
        response.extend_from_slice(&(data.len() as u16).to_be_bytes());
        response.extend_from_slice(&data);
    }
    response
}
