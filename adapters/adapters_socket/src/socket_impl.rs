//! Socket Implementation Module
//!
//! [`SocketImpl`] owns one socket handle and layers the listening lifecycle and
//! the chunked transfer protocol on top of a [`SocketBackend`].
//!
//! ## Transfer protocol
//!
//! - `write_n` sends the whole buffer in `chunk_size` pieces, advancing by the
//!   count each `send` reports. The first failing call aborts; bytes already
//!   handed to the OS stay sent.
//! - `read` accumulates `chunk_size` receives until the first short one.
//! - `read_until` does the same but stops at the first delimiter byte. Bytes that
//!   arrived after the delimiter are kept and served first by the next read.
//! - `read_n` fills a buffer exactly, failing if the peer closes early.
//!
//! Every fallible operation has a `*_with_error` sibling reporting through an
//! [`ErrorSlot`].

use std::fmt;
use std::io;
use std::mem;
use std::sync::Arc;

use entities_network_address::{AddressFamily, Endpoint, ErrorSlot, NetworkError};
use tracing::{debug, trace, warn};

use crate::backend::{SocketBackend, SystemSockets};
use crate::config::SocketConfig;
use crate::socket::SocketType;
use crate::stack::NetworkStack;

/// Blocking socket with chunked transfer
///
/// `is_open` tracks the listening state set by [`SocketImpl::open`]; transfers
/// only need a valid handle. Once the handle is closed or taken out, every
/// operation fails with [`NetworkError::InvalidHandle`].
pub struct SocketImpl<B: SocketBackend = SystemSockets> {
    backend: Arc<B>,
    handle: Option<B::Handle>,
    is_open: bool,
    config: SocketConfig,
    pending: Vec<u8>,
}

impl SocketImpl<SystemSockets> {
    /// Create an OS socket
    ///
    /// # Returns
    /// * `Err(NetworkError::StackNotRunning)` - [`NetworkStack::startup`] has not run
    /// * `Err(NetworkError::SocketCreateFailed)` - the OS refused the socket
    pub fn system(family: AddressFamily, socket_type: SocketType) -> Result<Self, NetworkError> {
        Self::system_with_config(family, socket_type, SocketConfig::default())
    }

    /// Create an OS socket with explicit transfer settings
    pub fn system_with_config(
        family: AddressFamily,
        socket_type: SocketType,
        config: SocketConfig,
    ) -> Result<Self, NetworkError> {
        NetworkStack::ensure_running()?;
        Self::with_config(Arc::new(SystemSockets), family, socket_type, config)
    }
}

impl<B: SocketBackend> SocketImpl<B> {
    /// Create a socket through `backend` with default settings
    pub fn new(
        backend: Arc<B>,
        family: AddressFamily,
        socket_type: SocketType,
    ) -> Result<Self, NetworkError> {
        Self::with_config(backend, family, socket_type, SocketConfig::default())
    }

    /// Create a socket through `backend`
    ///
    /// # Arguments
    /// * `backend` - Primitive provider, shared with sockets accepted from this one
    /// * `family` - Address family
    /// * `socket_type` - Stream or datagram
    /// * `config` - Chunk size, backlog and flags
    pub fn with_config(
        backend: Arc<B>,
        family: AddressFamily,
        socket_type: SocketType,
        config: SocketConfig,
    ) -> Result<Self, NetworkError> {
        let handle = backend
            .create(family, socket_type)
            .map_err(NetworkError::SocketCreateFailed)?;
        debug!(?family, ?socket_type, "socket created");
        Ok(Self::from_handle(backend, handle, config))
    }

    /// Take ownership of an existing handle
    pub fn from_handle(backend: Arc<B>, handle: B::Handle, config: SocketConfig) -> Self {
        Self {
            backend,
            handle: Some(handle),
            is_open: false,
            config,
            pending: Vec::new(),
        }
    }

    /// Whether `open` succeeded and the socket has not been closed since
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether the socket still owns a handle
    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// Transfer settings
    pub fn config(&self) -> &SocketConfig {
        &self.config
    }

    /// The owned handle
    pub fn handle(&self) -> Result<&B::Handle, NetworkError> {
        valid(&self.handle)
    }

    /// Move the handle out, leaving this socket invalid
    ///
    /// The caller becomes responsible for releasing the handle; dropping this
    /// socket afterwards closes nothing.
    pub fn take_handle(&mut self) -> Option<B::Handle> {
        self.is_open = false;
        self.pending.clear();
        self.handle.take()
    }

    /// Bind to `endpoint` and listen with the configured backlog
    pub fn open(&mut self, endpoint: &Endpoint) -> Result<(), NetworkError> {
        let backlog = self.config.backlog();
        self.open_with_backlog(endpoint, backlog)
    }

    /// Bind to `endpoint` and listen with `backlog`
    ///
    /// The socket becomes open only if both steps succeed.
    ///
    /// # Returns
    /// * `Err(NetworkError::BindFailed)` - bind refused; listen was not attempted
    /// * `Err(NetworkError::ListenFailed)` - bound, but listen refused
    pub fn open_with_backlog(&mut self, endpoint: &Endpoint, backlog: i32) -> Result<(), NetworkError> {
        let handle = valid(&self.handle)?;
        self.backend
            .bind(handle, endpoint)
            .map_err(NetworkError::BindFailed)?;
        self.backend
            .listen(handle, backlog)
            .map_err(NetworkError::ListenFailed)?;
        self.is_open = true;
        debug!(%endpoint, backlog, "socket listening");
        Ok(())
    }

    /// Release the handle
    ///
    /// Always leaves the socket closed; closing a closed socket does nothing. A
    /// failure reported by the OS is logged and otherwise ignored.
    pub fn close(&mut self) {
        self.is_open = false;
        self.pending.clear();
        if let Some(handle) = self.handle.take() {
            match self.backend.close(handle) {
                Ok(()) => debug!("socket closed"),
                Err(e) => warn!(error = %e, "socket close failed"),
            }
        }
    }

    /// Wait for an incoming connection
    ///
    /// # Returns
    /// The connected socket, sharing this socket's backend and settings, and the
    /// peer endpoint
    pub fn accept(&self) -> Result<(SocketImpl<B>, Endpoint), NetworkError> {
        let handle = valid(&self.handle)?;
        let (peer_handle, peer) = self
            .backend
            .accept(handle)
            .map_err(NetworkError::AcceptFailed)?;
        debug!(%peer, "connection accepted");
        let socket = Self::from_handle(Arc::clone(&self.backend), peer_handle, self.config);
        Ok((socket, peer))
    }

    /// Connect to `endpoint`
    pub fn connect(&self, endpoint: &Endpoint) -> Result<(), NetworkError> {
        let handle = valid(&self.handle)?;
        self.backend
            .connect(handle, endpoint)
            .map_err(NetworkError::ConnectFailed)?;
        debug!(%endpoint, "socket connected");
        Ok(())
    }

    /// Locally bound endpoint
    pub fn local_endpoint(&self) -> Result<Endpoint, NetworkError> {
        let handle = valid(&self.handle)?;
        self.backend
            .local_endpoint(handle)
            .map_err(NetworkError::AddressQueryFailed)
    }

    /// Send all of `data`
    ///
    /// An empty buffer performs no `send` calls.
    pub fn write_n(&self, data: &[u8]) -> Result<(), NetworkError> {
        let handle = valid(&self.handle)?;
        let chunk_size = self.config.chunk_size();
        let mut sent = 0;
        while sent < data.len() {
            let end = data.len().min(sent.saturating_add(chunk_size));
            let n = self
                .backend
                .send(handle, &data[sent..end], self.config.send_flags())
                .map_err(|e| {
                    warn!(error = %e, sent, total = data.len(), "send failed");
                    NetworkError::TransferFailed(e)
                })?;
            if n == 0 {
                return Err(NetworkError::TransferFailed(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "send accepted no bytes",
                )));
            }
            trace!(chunk = n, sent = sent + n, "chunk sent");
            sent += n;
        }
        trace!(bytes = data.len(), "write complete");
        Ok(())
    }

    /// Send the bytes of `text`
    pub fn write(&self, text: &str) -> Result<(), NetworkError> {
        self.write_n(text.as_bytes())
    }

    /// Fill `buf` completely
    ///
    /// Pending bytes left by `read_until` are consumed first. On failure the
    /// bytes already read stay pending for the next read.
    ///
    /// # Returns
    /// * `Err(NetworkError::TransferFailed)` - `recv` failed, or the peer closed
    ///   before `buf` was full (`UnexpectedEof`)
    pub fn read_n(&mut self, buf: &mut [u8]) -> Result<(), NetworkError> {
        let handle = valid(&self.handle)?;
        let mut filled = self.pending.len().min(buf.len());
        buf[..filled].copy_from_slice(&self.pending[..filled]);
        self.pending = self.pending.split_off(filled);

        let chunk_size = self.config.chunk_size();
        while filled < buf.len() {
            let end = buf.len().min(filled.saturating_add(chunk_size));
            let received = self
                .backend
                .recv(handle, &mut buf[filled..end], self.config.recv_flags());
            let n = match received {
                Ok(0) => {
                    warn!(filled, expected = buf.len(), "peer closed during exact read");
                    Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed before the buffer was filled",
                    ))
                }
                other => other,
            };
            match n {
                Ok(n) => filled += n,
                Err(e) => {
                    self.pending = buf[..filled].to_vec();
                    return Err(NetworkError::TransferFailed(e));
                }
            }
        }
        trace!(bytes = buf.len(), "exact read complete");
        Ok(())
    }

    /// Read what is currently available
    ///
    /// `data` is cleared, then receives accumulate until one returns fewer than
    /// `chunk_size` bytes. If bytes are pending from `read_until`, they are
    /// returned alone without touching the socket. If a receive fails, bytes
    /// from earlier chunks stay pending.
    ///
    /// # Returns
    /// Number of bytes now in `data`
    pub fn read(&mut self, data: &mut Vec<u8>) -> Result<usize, NetworkError> {
        data.clear();
        let handle = valid(&self.handle)?;
        if !self.pending.is_empty() {
            data.append(&mut self.pending);
            return Ok(data.len());
        }

        let chunk_size = self.config.chunk_size();
        let mut chunk = vec![0u8; chunk_size];
        loop {
            let n = match self.backend.recv(handle, &mut chunk, self.config.recv_flags()) {
                Ok(n) => n,
                Err(e) => {
                    self.pending = mem::take(data);
                    return Err(NetworkError::TransferFailed(e));
                }
            };
            trace!(chunk = n, "chunk received");
            data.extend_from_slice(&chunk[..n]);
            if n < chunk_size {
                break;
            }
        }
        trace!(bytes = data.len(), "read complete");
        Ok(data.len())
    }

    /// Read up to the first `delimiter`
    ///
    /// `data` is cleared and receives everything before the delimiter; the
    /// delimiter itself is consumed. If a short receive ends the data without a
    /// delimiter, `data` holds everything read. If a receive fails, the bytes
    /// read so far (including earlier pending bytes) stay pending.
    ///
    /// # Returns
    /// `true` if the delimiter was found
    pub fn read_until(&mut self, data: &mut Vec<u8>, delimiter: u8) -> Result<bool, NetworkError> {
        data.clear();
        let handle = valid(&self.handle)?;
        if !self.pending.is_empty() {
            let pending = mem::take(&mut self.pending);
            if let Some(rest) = append_until(data, &pending, delimiter) {
                self.pending.extend_from_slice(rest);
                return Ok(true);
            }
        }

        let chunk_size = self.config.chunk_size();
        let mut chunk = vec![0u8; chunk_size];
        loop {
            let n = match self.backend.recv(handle, &mut chunk, self.config.recv_flags()) {
                Ok(n) => n,
                Err(e) => {
                    self.pending = mem::take(data);
                    return Err(NetworkError::TransferFailed(e));
                }
            };
            if let Some(rest) = append_until(data, &chunk[..n], delimiter) {
                self.pending.extend_from_slice(rest);
                trace!(bytes = data.len(), pending = self.pending.len(), "delimiter found");
                return Ok(true);
            }
            if n < chunk_size {
                trace!(bytes = data.len(), "read ended without delimiter");
                return Ok(false);
            }
        }
    }

    /// [`SocketImpl::open`] reporting through `error`
    pub fn open_with_error(&mut self, endpoint: &Endpoint, error: &mut ErrorSlot) -> bool {
        error.record(|| self.open(endpoint)).is_some()
    }

    /// [`SocketImpl::open_with_backlog`] reporting through `error`
    pub fn open_with_backlog_with_error(
        &mut self,
        endpoint: &Endpoint,
        backlog: i32,
        error: &mut ErrorSlot,
    ) -> bool {
        error.record(|| self.open_with_backlog(endpoint, backlog)).is_some()
    }

    /// [`SocketImpl::accept`] reporting through `error`
    pub fn accept_with_error(&self, error: &mut ErrorSlot) -> Option<(SocketImpl<B>, Endpoint)> {
        error.record(|| self.accept())
    }

    /// [`SocketImpl::connect`] reporting through `error`
    pub fn connect_with_error(&self, endpoint: &Endpoint, error: &mut ErrorSlot) -> bool {
        error.record(|| self.connect(endpoint)).is_some()
    }

    /// [`SocketImpl::write_n`] reporting through `error`
    pub fn write_n_with_error(&self, data: &[u8], error: &mut ErrorSlot) -> bool {
        error.record(|| self.write_n(data)).is_some()
    }

    /// [`SocketImpl::write`] reporting through `error`
    pub fn write_with_error(&self, text: &str, error: &mut ErrorSlot) -> bool {
        error.record(|| self.write(text)).is_some()
    }

    /// [`SocketImpl::read_n`] reporting through `error`
    pub fn read_n_with_error(&mut self, buf: &mut [u8], error: &mut ErrorSlot) -> bool {
        error.record(|| self.read_n(buf)).is_some()
    }

    /// [`SocketImpl::read`] reporting through `error`
    pub fn read_with_error(&mut self, data: &mut Vec<u8>, error: &mut ErrorSlot) -> Option<usize> {
        error.record(|| self.read(data))
    }

    /// [`SocketImpl::read_until`] reporting through `error`
    pub fn read_until_with_error(
        &mut self,
        data: &mut Vec<u8>,
        delimiter: u8,
        error: &mut ErrorSlot,
    ) -> Option<bool> {
        error.record(|| self.read_until(data, delimiter))
    }
}

impl<B: SocketBackend> Drop for SocketImpl<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: SocketBackend> fmt::Debug for SocketImpl<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketImpl")
            .field("valid", &self.handle.is_some())
            .field("is_open", &self.is_open)
            .field("config", &self.config)
            .field("pending", &self.pending.len())
            .finish()
    }
}

fn valid<H>(handle: &Option<H>) -> Result<&H, NetworkError> {
    handle.as_ref().ok_or(NetworkError::InvalidHandle)
}

/// Append `chunk` to `data` up to the first `delimiter`
///
/// Returns the bytes after the delimiter, or `None` if it is absent (the whole
/// chunk is appended).
fn append_until<'a>(data: &mut Vec<u8>, chunk: &'a [u8], delimiter: u8) -> Option<&'a [u8]> {
    match chunk.iter().position(|&b| b == delimiter) {
        Some(at) => {
            data.extend_from_slice(&chunk[..at]);
            Some(&chunk[at + 1..])
        }
        None => {
            data.extend_from_slice(chunk);
            None
        }
    }
}
