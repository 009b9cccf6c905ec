use dnsproxy_domain::NetProtocol;
use dnsproxy_infrastructure::dns::transport::tcp::{
    read_with_length_prefix, send_with_length_prefix,
};
use dnsproxy_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

const MAX_UDP_MESSAGE_SIZE: usize = 4096;
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause after a persistent socket error (e.g. EMFILE) before retrying.
const ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// UDP and TCP listeners on one address, sharing a handler.
pub struct DnsServer {
    listen_addr: SocketAddr,
    udp_socket: Arc<UdpSocket>,
    tcp_listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    tracker: TaskTracker,
}

impl DnsServer {
    pub fn bind(listen_addr: SocketAddr, handler: Arc<DnsServerHandler>) -> anyhow::Result<Self> {
        let domain = if listen_addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let udp_socket = Arc::new(create_udp_socket(domain, listen_addr)?);
        let tcp_listener = create_tcp_listener(domain, listen_addr)?;

        Ok(Self {
            listen_addr,
            udp_socket,
            tcp_listener,
            handler,
            tracker: TaskTracker::new(),
        })
    }

    /// Serves until `shutdown` fires, then waits for in-flight queries.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(bind_address = %self.listen_addr, "DNS server ready (UDP + TCP)");

        let udp = run_udp_loop(
            Arc::clone(&self.udp_socket),
            Arc::clone(&self.handler),
            self.tracker.clone(),
            shutdown.clone(),
        );
        let tcp = run_tcp_loop(
            self.tcp_listener,
            Arc::clone(&self.handler),
            self.tracker.clone(),
            shutdown.clone(),
        );
        tokio::join!(udp, tcp);

        self.tracker.close();
        info!(in_flight = self.tracker.len(), "Listeners closed, draining in-flight queries");
        self.tracker.wait().await;
        info!("DNS server stopped");
    }
}

async fn run_udp_loop(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
) {
    let mut recv_buf = [0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (n, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = socket.recv_from(&mut recv_buf) => match result {
                Ok(received) => received,
                Err(e) if is_transient(&e) => continue,
                Err(e) => {
                    error!(error = %e, "UDP recv error");
                    backoff(&shutdown).await;
                    continue;
                }
            },
        };

        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);
        tracker.spawn(async move {
            if let Some(response) = handler.handle_raw(&query, NetProtocol::Udp, from).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "Failed to send UDP reply");
                }
            }
        });
    }

    debug!("UDP listener stopped");
}

async fn run_tcp_loop(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = listener.accept() => match result {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(error = %e, "TCP accept error");
                    backoff(&shutdown).await;
                    continue;
                }
            },
        };

        let handler = Arc::clone(&handler);
        let shutdown = shutdown.clone();
        tracker.spawn(async move {
            serve_tcp_connection(stream, peer, handler, shutdown).await;
        });
    }

    debug!("TCP listener stopped");
}

/// Length-prefixed messages until the peer closes, goes idle or shutdown.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) {
    loop {
        let query = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream)) => {
                match result {
                    Ok(Ok(query)) => query,
                    Ok(Err(e)) => {
                        if e.kind() != io::ErrorKind::UnexpectedEof {
                            debug!(client = %peer, error = %e, "TCP read failed");
                        }
                        break;
                    }
                    Err(_) => {
                        debug!(client = %peer, "TCP connection idle, closing");
                        break;
                    }
                }
            }
        };

        let Some(response) = handler.handle_raw(&query, NetProtocol::Tcp, peer).await else {
            continue;
        };

        if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
            debug!(client = %peer, error = %e, "Failed to send TCP reply");
            break;
        }
    }
}

async fn backoff(shutdown: &CancellationToken) {
    tokio::select! {
        _ = shutdown.cancelled() => {}
        _ = tokio::time::sleep(ERROR_BACKOFF) => {}
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::ConnectionReset
    )
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
