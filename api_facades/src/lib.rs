//! API Facades Layer
//!
//! Provides the public surface of the workspace in two namespaces:
//! - [`ip`]: addresses, endpoints and the `v4()` / `v6()` protocol markers
//! - [`socket`]: socket construction by protocol and the chunked transfer API
//!
//! All facades call underlying Rust modules from inner layers.

pub mod ip;
pub mod socket;

pub use entities_network_address::{ErrorSlot, NetworkError};
