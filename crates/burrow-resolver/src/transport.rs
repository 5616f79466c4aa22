//! Datagram transport.

use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No datagram arrived within the receive timeout.
    #[error("no response within {after:?}")]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },

    /// Socket error.
    #[error("network error: {0}")]
    Network(#[from] io::Error),
}

impl TransportError {
    /// Returns true for the timeout case, which is the only transport
    /// failure that warrants a resend.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// One-datagram-at-a-time transport used by the resolution engine.
///
/// The engine sends a query and then waits for a single reply on the same
/// transport; it never has more than one transaction in flight.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one datagram to the given server.
    async fn send(&self, payload: &[u8], server: SocketAddr) -> Result<(), TransportError>;

    /// Receives one datagram, returning its length. Waits at most the
    /// transport's configured timeout.
    async fn receive(&self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

/// UDP transport bound to ephemeral local ports.
///
/// One socket is bound per address family so nameservers can be queried
/// over both IPv4 and IPv6. The IPv6 socket is optional: on a host without
/// IPv6 support, sends to IPv6 servers fail with a network error and the
/// walk moves on to another server.
#[derive(Debug)]
pub struct UdpTransport {
    v4: UdpSocket,
    v6: Option<UdpSocket>,
    /// Which socket the next receive should listen on, set by the last
    /// send. Sound because the engine runs one transaction at a time.
    await_v6: AtomicBool,
    timeout: Duration,
}

impl UdpTransport {
    /// Binds sockets on ephemeral ports.
    pub async fn bind(timeout: Duration) -> io::Result<Self> {
        let v4 = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
        let v6 = match UdpSocket::bind((Ipv6Addr::UNSPECIFIED, 0)).await {
            Ok(socket) => Some(socket),
            Err(error) => {
                debug!(%error, "IPv6 socket unavailable, continuing with IPv4 only");
                None
            }
        };
        Ok(Self {
            v4,
            v6,
            await_v6: AtomicBool::new(false),
            timeout,
        })
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&self, payload: &[u8], server: SocketAddr) -> Result<(), TransportError> {
        let socket = match server {
            SocketAddr::V4(_) => &self.v4,
            SocketAddr::V6(_) => self.v6.as_ref().ok_or_else(|| {
                TransportError::Network(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "host has no IPv6 socket",
                ))
            })?,
        };
        socket.send_to(payload, server).await?;
        self.await_v6
            .store(server.is_ipv6(), Ordering::Relaxed);
        Ok(())
    }

    async fn receive(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let socket = match &self.v6 {
            Some(v6) if self.await_v6.load(Ordering::Relaxed) => v6,
            _ => &self.v4,
        };
        match tokio::time::timeout(self.timeout, socket.recv(buf)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(TransportError::Timeout {
                after: self.timeout,
            }),
        }
    }
}
