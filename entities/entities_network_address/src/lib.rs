//! Entities Layer: Network Addresses
//!
//! Provides the address data model used by the socket adapters: IPv4 and IPv6
//! addresses, a family-agnostic address variant, and socket endpoints.
//!
//! ## Overview
//!
//! The `entities_network_address` crate is part of the entities layer. It has no
//! I/O of its own; it only describes *where* a socket talks to:
//!
//! - **[`address_v4`](address_v4/index.html)**: 4-byte IPv4 address in network
//!   byte order, dotted-decimal parsing/formatting, classful classification
//! - **[`address_v6`](address_v6/index.html)**: 16-byte IPv6 address plus scope id
//! - **[`address`](address/index.html)**: [`Address`] enum over both families
//! - **[`endpoint`](endpoint/index.html)**: [`Endpoint`] (address + port) with a
//!   scoped view of the platform `sockaddr`
//! - **[`error`](error/index.html)**: [`NetworkError`] and the out-of-band
//!   [`ErrorSlot`]
//!
//! ## Usage
//!
//! ```rust
//! use entities_network_address::{to_address, Endpoint};
//!
//! let addr = to_address("127.0.0.1");
//! assert!(addr.is_v4() && addr.is_loopback());
//!
//! let ep = Endpoint::new(addr, 8080);
//! assert_eq!(ep.to_string(), "127.0.0.1:8080");
//! ```
//!
//! ## See Also
//!
//! - [`adapters_socket`](../adapters_socket/index.html): Sockets that consume these endpoints

pub mod address;
pub mod address_v4;
pub mod address_v6;
pub mod endpoint;
pub mod error;

pub use address::{to_address, to_address_with_error, Address, AddressFamily};
pub use address_v4::{
    to_address_v4, to_address_v4_with_error, AddressClass, AddressV4, IN4_ADDR_LEN,
    IN4_ADDR_STR_LEN,
};
pub use address_v6::{
    to_address_v6, to_address_v6_with_error, AddressV6, IN6_ADDR_LEN, IN6_ADDR_STR_LEN,
    LOOPBACK_SCOPE_ID,
};
pub use endpoint::Endpoint;
pub use error::{ErrorSlot, NetworkError};
