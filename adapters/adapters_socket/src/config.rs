//! Configuration Module
//!
//! Per-socket transfer settings: chunk size, listen backlog and the flags passed
//! to every `send`/`recv` call.

/// Default transfer chunk in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Largest accepted chunk size (64 MiB)
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Default listen backlog; the OS clamps it to its own maximum
pub const DEFAULT_BACKLOG: i32 = i32::MAX;

/// Environment variable overriding the chunk size
pub const CHUNK_SIZE_ENV: &str = "NET_SOCKET_CHUNK_SIZE";

/// Environment variable overriding the listen backlog
pub const BACKLOG_ENV: &str = "NET_SOCKET_BACKLOG";

/// Socket transfer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketConfig {
    chunk_size: usize,
    backlog: i32,
    send_flags: i32,
    recv_flags: i32,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            backlog: DEFAULT_BACKLOG,
            send_flags: 0,
            recv_flags: 0,
        }
    }
}

impl SocketConfig {
    /// Defaults overridden by `NET_SOCKET_CHUNK_SIZE` / `NET_SOCKET_BACKLOG`
    ///
    /// Unset or unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the variable names
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(size) = lookup(CHUNK_SIZE_ENV).and_then(|v| v.trim().parse().ok()) {
            config = config.with_chunk_size(size);
        }
        if let Some(backlog) = lookup(BACKLOG_ENV).and_then(|v| v.trim().parse().ok()) {
            config = config.with_backlog(backlog);
        }
        config
    }

    /// Set the chunk size; 0 and values above [`MAX_CHUNK_SIZE`] are ignored
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        if (1..=MAX_CHUNK_SIZE).contains(&chunk_size) {
            self.chunk_size = chunk_size;
        }
        self
    }

    /// Set the listen backlog
    pub fn with_backlog(mut self, backlog: i32) -> Self {
        self.backlog = backlog;
        self
    }

    /// Set the flags for every `send` call
    pub fn with_send_flags(mut self, flags: i32) -> Self {
        self.send_flags = flags;
        self
    }

    /// Set the flags for every `recv` call
    pub fn with_recv_flags(mut self, flags: i32) -> Self {
        self.recv_flags = flags;
        self
    }

    /// Bytes per `send`/`recv` call
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Listen backlog used by `open`
    pub fn backlog(&self) -> i32 {
        self.backlog
    }

    /// Flags for `send`
    pub fn send_flags(&self) -> i32 {
        self.send_flags
    }

    /// Flags for `recv`
    pub fn recv_flags(&self) -> i32 {
        self.recv_flags
    }
}
