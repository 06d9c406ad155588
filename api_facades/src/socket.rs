//! Socket Facades
//!
//! Socket construction keyed by [`InternetProtocol`] plus re-exports of the
//! socket adapter surface.

pub use adapters_socket::{
    last_platform_error, NetworkStack, SocketBackend, SocketConfig, SocketImpl, SocketType,
    SystemSockets,
};

use entities_network_address::NetworkError;

use crate::ip::InternetProtocol;

/// Stream socket of `protocol`'s family
///
/// Requires [`NetworkStack::startup`].
pub fn stream(protocol: InternetProtocol) -> Result<SocketImpl, NetworkError> {
    SocketImpl::system(protocol.family(), SocketType::Stream)
}

/// Datagram socket of `protocol`'s family
pub fn datagram(protocol: InternetProtocol) -> Result<SocketImpl, NetworkError> {
    SocketImpl::system(protocol.family(), SocketType::Datagram)
}

/// Stream socket with explicit transfer settings
pub fn stream_with_config(
    protocol: InternetProtocol,
    config: SocketConfig,
) -> Result<SocketImpl, NetworkError> {
    SocketImpl::system_with_config(protocol.family(), SocketType::Stream, config)
}
