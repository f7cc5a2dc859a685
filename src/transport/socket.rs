//! Minimal UDP socket wrapper for TCNet transport.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use super::BROADCAST_PORT;

/// Error type for socket operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Underlying I/O error
    #[error("socket i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Binding for a UDP socket.
#[derive(Debug, Clone)]
pub struct SocketBinding {
    socket: Arc<UdpSocket>,
}

impl SocketBinding {
    /// Bind to the provided address.
    pub fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(false)?;
        Ok(Self {
            socket: Arc::new(socket),
        })
    }

    /// Bind to the TCNet broadcast port on all interfaces with broadcast
    /// sending enabled.
    pub fn bind_broadcast() -> Result<Self, TransportError> {
        let binding = Self::bind(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            BROADCAST_PORT,
        )))?;
        binding.set_broadcast(true)?;
        Ok(binding)
    }

    /// Allow or forbid sending to broadcast addresses.
    pub fn set_broadcast(&self, broadcast: bool) -> Result<(), TransportError> {
        self.socket.set_broadcast(broadcast)?;
        Ok(())
    }

    /// Set socket read timeout.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<(), TransportError> {
        self.socket.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Adjust the non-blocking mode.
    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<(), TransportError> {
        self.socket.set_nonblocking(nonblocking)?;
        Ok(())
    }

    /// Send bytes to a remote address.
    pub fn send_to(&self, buf: &[u8], addr: SocketAddr) -> Result<usize, TransportError> {
        Ok(self.socket.send_to(buf, addr)?)
    }

    /// Send bytes to the limited broadcast address on the TCNet port.
    pub fn broadcast(&self, buf: &[u8]) -> Result<usize, TransportError> {
        self.send_to(
            buf,
            SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::BROADCAST, BROADCAST_PORT)),
        )
    }

    /// Receive bytes into the provided buffer.
    pub fn recv_from(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), TransportError> {
        Ok(self.socket.recv_from(buf)?)
    }

    /// Access the local address for this binding.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }
}
