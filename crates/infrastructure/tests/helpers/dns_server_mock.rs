#![allow(dead_code)]
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// How the mock upstream answers each query.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// One A record 10.0.0.0 with the given TTL
    Answer { ttl: u32 },
    /// A valid answer padded with trailing bytes up to `size`
    Oversized { size: usize },
    /// A valid answer with `count` A records
    Many { count: u16 },
    /// A valid answer whose ID differs from the query's
    WrongId,
    ServFail,
    /// Never replies
    Silent,
}

/// Loopback upstream on an ephemeral port, over UDP or TCP.
pub struct MockDnsServer {
    addr: SocketAddr,
    scheme: &'static str,
    queries: Arc<AtomicU64>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_response(&buf[..len], behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            scheme: "udp",
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Same behaviors over TCP with two-byte length framing, one query per
    /// connection.
    pub async fn start_tcp(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let queries = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = listener.accept() => {
                        let Ok((mut stream, _)) = result else { continue };
                        counter.fetch_add(1, Ordering::SeqCst);
                        tokio::spawn(async move {
                            let mut length_buf = [0u8; 2];
                            if stream.read_exact(&mut length_buf).await.is_err() {
                                return;
                            }
                            let mut query = vec![0u8; u16::from_be_bytes(length_buf) as usize];
                            if stream.read_exact(&mut query).await.is_err() {
                                return;
                            }
                            if let Some(response) = Self::build_response(&query, behavior) {
                                let mut frame = (response.len() as u16).to_be_bytes().to_vec();
                                frame.extend_from_slice(&response);
                                let _ = stream.write_all(&frame).await;
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            scheme: "tcp",
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `udp://` or `tcp://` server string for pool configuration
    pub fn upstream_url(&self) -> String {
        format!("{}://{}", self.scheme, self.addr)
    }

    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::SeqCst)
    }

    fn build_response(query: &[u8], behavior: MockBehavior) -> Option<Vec<u8>> {
        if query.len() < 12 {
            return None;
        }

        match behavior {
            MockBehavior::Silent => None,
            MockBehavior::Answer { ttl } => Some(Self::answer(query, ttl)),
            MockBehavior::Many { count } => Some(Self::answers(query, 60, count)),
            MockBehavior::WrongId => {
                let mut response = Self::answer(query, 60);
                response[0] ^= 0xff;
                Some(response)
            }
            MockBehavior::Oversized { size } => {
                let mut response = Self::answer(query, 60);
                response.resize(size.max(response.len()), 0);
                Some(response)
            }
            MockBehavior::ServFail => {
                let mut response = Self::header(query, 0x82, 0);
                response.extend_from_slice(&query[12..]);
                Some(response)
            }
        }
    }

    fn header(query: &[u8], rcode_flags: u8, answers: u16) -> Vec<u8> {
        let mut response = Vec::with_capacity(512);
        response.extend_from_slice(&query[0..2]); // ID
        response.push(0x81); // QR=1, RD=1
        response.push(rcode_flags); // RA=1 | RCODE
        response.extend_from_slice(&query[4..6]); // QDCOUNT
        response.extend_from_slice(&answers.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x00]); // NSCOUNT
        response.extend_from_slice(&[0x00, 0x00]); // ARCOUNT
        response
    }

    fn answer(query: &[u8], ttl: u32) -> Vec<u8> {
        Self::answers(query, ttl, 1)
    }

    fn answers(query: &[u8], ttl: u32, count: u16) -> Vec<u8> {
        let mut response = Self::header(query, 0x80, count);
        response.extend_from_slice(&query[12..]);
        for i in 0..count {
            response.extend_from_slice(&[
                0xc0, 0x0c, // pointer to question name
                0x00, 0x01, // A
                0x00, 0x01, // IN
            ]);
            response.extend_from_slice(&ttl.to_be_bytes());
            let [hi, lo] = i.to_be_bytes();
            response.extend_from_slice(&[0x00, 0x04, 10, 0, hi, lo]);
        }
        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
