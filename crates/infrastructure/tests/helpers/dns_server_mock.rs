use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record, RecordType};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// A record for every question, on both transports.
    Answer(Ipv4Addr),
    /// Empty response carrying this code.
    Code(ResponseCode),
    /// Answer with the query id plus one.
    WrongId(Ipv4Addr),
    /// TC bit without answers over UDP, full answer over TCP.
    TruncatedOverUdp(Ipv4Addr),
    /// Never reply.
    Silent,
}

/// Loopback DNS server listening on UDP and TCP on the same port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> std::io::Result<Self> {
        let udp = UdpSocket::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
        let addr = udp.local_addr()?;
        let tcp = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = udp.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::respond(&buf[..len], behavior, false) {
                                let _ = udp.send_to(&response, peer).await;
                            }
                        }
                    }
                    result = tcp.accept() => {
                        if let Ok((mut stream, _)) = result {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(async move {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                if let Some(response) = Self::respond(&query, behavior, true) {
                                    let mut framed = (response.len() as u16).to_be_bytes().to_vec();
                                    framed.extend_from_slice(&response);
                                    let _ = stream.write_all(&framed).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
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

    fn respond(query: &[u8], behavior: MockBehavior, over_tcp: bool) -> Option<Vec<u8>> {
        let request = Message::from_vec(query).ok()?;

        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_response_code(ResponseCode::NoError);
        response.add_queries(request.queries().iter().cloned());

        match behavior {
            MockBehavior::Silent => return None,
            MockBehavior::Code(code) => {
                response.set_response_code(code);
            }
            MockBehavior::Answer(ip) => Self::add_answers(&mut response, &request, ip),
            MockBehavior::WrongId(ip) => {
                response.set_id(request.id().wrapping_add(1));
                Self::add_answers(&mut response, &request, ip);
            }
            MockBehavior::TruncatedOverUdp(ip) => {
                if over_tcp {
                    Self::add_answers(&mut response, &request, ip);
                } else {
                    response.set_truncated(true);
                }
            }
        }

        response.to_vec().ok()
    }

    fn add_answers(response: &mut Message, request: &Message, ip: Ipv4Addr) {
        for query in request.queries() {
            if query.query_type() == RecordType::A {
                response.add_answer(Record::from_rdata(query.name().clone(), 60, RData::A(A(ip))));
            }
        }
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
