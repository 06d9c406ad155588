//! Backend Module
//!
//! The raw socket primitives that [`SocketImpl`](crate::SocketImpl) is built on.
//! Each primitive is a thin forwarding call to the operating system;
//! [`SystemSockets`] implements them with `socket2`.

use std::io;
use std::mem::MaybeUninit;

use entities_network_address::{AddressFamily, Endpoint};
use socket2::Socket;

use crate::socket::{domain, SocketType};

/// Raw socket primitives
///
/// A failed primitive returns the OS error; callers translate it into the
/// matching `NetworkError` variant.
#[cfg_attr(test, mockall::automock(type Handle = u32;))]
pub trait SocketBackend {
    /// Owned OS socket handle
    type Handle;

    /// Create a socket of `family` and `socket_type`
    fn create(&self, family: AddressFamily, socket_type: SocketType) -> io::Result<Self::Handle>;

    /// Bind to a local endpoint
    fn bind(&self, handle: &Self::Handle, endpoint: &Endpoint) -> io::Result<()>;

    /// Start listening
    fn listen(&self, handle: &Self::Handle, backlog: i32) -> io::Result<()>;

    /// Accept a pending connection and report the peer
    fn accept(&self, handle: &Self::Handle) -> io::Result<(Self::Handle, Endpoint)>;

    /// Connect to a remote endpoint
    fn connect(&self, handle: &Self::Handle, endpoint: &Endpoint) -> io::Result<()>;

    /// Locally bound endpoint
    fn local_endpoint(&self, handle: &Self::Handle) -> io::Result<Endpoint>;

    /// Release the handle
    fn close(&self, handle: Self::Handle) -> io::Result<()>;

    /// Send bytes, returning how many the OS accepted
    fn send(&self, handle: &Self::Handle, data: &[u8], flags: i32) -> io::Result<usize>;

    /// Receive into `buf`, returning how many bytes arrived (0 on orderly shutdown)
    fn recv(&self, handle: &Self::Handle, buf: &mut [u8], flags: i32) -> io::Result<usize>;
}

/// OS sockets through `socket2`
///
/// Sockets are created in blocking mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSockets;

impl SocketBackend for SystemSockets {
    type Handle = Socket;

    fn create(&self, family: AddressFamily, socket_type: SocketType) -> io::Result<Socket> {
        Socket::new(domain(family), socket_type.into(), None)
    }

    fn bind(&self, handle: &Socket, endpoint: &Endpoint) -> io::Result<()> {
        endpoint.with_sock_addr(|raw| handle.bind(raw))
    }

    fn listen(&self, handle: &Socket, backlog: i32) -> io::Result<()> {
        handle.listen(backlog)
    }

    fn accept(&self, handle: &Socket) -> io::Result<(Socket, Endpoint)> {
        let (socket, raw) = handle.accept()?;
        let peer = Endpoint::from_sock_addr(&raw)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok((socket, peer))
    }

    fn connect(&self, handle: &Socket, endpoint: &Endpoint) -> io::Result<()> {
        endpoint.with_sock_addr(|raw| handle.connect(raw))
    }

    fn local_endpoint(&self, handle: &Socket) -> io::Result<Endpoint> {
        let raw = handle.local_addr()?;
        Endpoint::from_sock_addr(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn close(&self, handle: Socket) -> io::Result<()> {
        drop(handle);
        Ok(())
    }

    fn send(&self, handle: &Socket, data: &[u8], flags: i32) -> io::Result<usize> {
        handle.send_with_flags(data, flags)
    }

    fn recv(&self, handle: &Socket, buf: &mut [u8], flags: i32) -> io::Result<usize> {
        // SAFETY: `MaybeUninit<u8>` has the layout of `u8`, the slice is already
        // initialised, and recv only ever writes initialised bytes into it.
        let buf = unsafe { &mut *(buf as *mut [u8] as *mut [MaybeUninit<u8>]) };
        handle.recv_with_flags(buf, flags)
    }
}

/// Last error code reported by the platform socket layer (`errno` / `WSAGetLastError`)
pub fn last_platform_error() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}
