//! Adapters Layer: Blocking Sockets
//!
//! Provides blocking stream and datagram sockets with a chunked transfer protocol
//! on top of the operating system's socket API. Socket primitives are reached
//! through the `socket2` crate for safe, cross-platform socket operations.
//!
//! ## Overview
//!
//! The `adapters_socket` crate provides:
//! - **Socket kinds**: stream and datagram, IPv4 and IPv6
//! - **Socket primitives**: create, bind, listen, accept, connect, send, recv
//!   behind the [`SocketBackend`] trait
//! - **Chunked transfer**: [`SocketImpl`] with `write_n`, `read`, `read_until`
//!   and `read_n`
//! - **Lifecycle**: process-wide [`NetworkStack`] startup and shutdown
//! - **Configuration**: [`SocketConfig`] chunk size, backlog and flags
//!
//! ## Architecture
//!
//! This crate is part of the adapters layer. It depends on:
//! - `entities_network_address`: For addresses, endpoints and error types
//!
//! ## See Also
//!
//! - [`entities_network_address`](../entities_network_address/index.html): Address model

pub mod backend;
pub mod config;
pub mod socket;
pub mod socket_impl;
pub mod stack;

pub use backend::{last_platform_error, SocketBackend, SystemSockets};
pub use config::SocketConfig;
pub use socket::{domain, SocketType};
pub use socket_impl::SocketImpl;
pub use stack::NetworkStack;

pub use entities_network_address::{AddressFamily, Endpoint, ErrorSlot, NetworkError};
