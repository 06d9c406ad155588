//! Socket Module
//!
//! Socket kinds and the mapping from the crate's family/type enums to the
//! `socket2` constants used when the OS creates a socket.

use entities_network_address::AddressFamily;
use socket2::{Domain, Type};

/// Socket type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
    /// Stream socket (TCP)
    Stream,
    /// Datagram socket (UDP)
    Datagram,
}

impl From<SocketType> for Type {
    fn from(ty: SocketType) -> Self {
        match ty {
            SocketType::Stream => Type::STREAM,
            SocketType::Datagram => Type::DGRAM,
        }
    }
}

/// `socket2` domain for an address family
pub fn domain(family: AddressFamily) -> Domain {
    match family {
        AddressFamily::Ipv4 => Domain::IPV4,
        AddressFamily::Ipv6 => Domain::IPV6,
    }
}
