//! Endpoint Module
//!
//! An address plus a port, held as either an IPv4 or an IPv6 socket address.
//! The port is stored in network byte order; every accessor speaks host order.
//!
//! The OS-facing representation is produced on demand through
//! [`Endpoint::with_sock_addr`], which lends a `socket2::SockAddr` (pointer plus
//! length of the platform `sockaddr_in` / `sockaddr_in6`) for the duration of a
//! single call.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::str::FromStr;

use socket2::SockAddr;

use crate::address::{Address, AddressFamily};
use crate::address_v4::AddressV4;
use crate::address_v6::{AddressV6, LOOPBACK_SCOPE_ID};
use crate::error::NetworkError;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct SockAddrIn4 {
    /// Network byte order
    port: u16,
    addr: AddressV4,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct SockAddrIn6 {
    /// Network byte order
    port: u16,
    flowinfo: u32,
    addr: AddressV6,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Repr {
    V4(SockAddrIn4),
    V6(SockAddrIn6),
}

/// Socket endpoint (address + port)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    repr: Repr,
}

impl Default for Endpoint {
    /// IPv4 "any", port 0
    fn default() -> Self {
        Self::new(Address::V4(AddressV4::any()), 0)
    }
}

impl Endpoint {
    /// Create an endpoint; `port` is in host byte order
    pub fn new(address: impl Into<Address>, port: u16) -> Self {
        let repr = match address.into() {
            Address::V4(addr) => Repr::V4(SockAddrIn4 {
                port: port.to_be(),
                addr,
            }),
            Address::V6(addr) => Repr::V6(SockAddrIn6 {
                port: port.to_be(),
                flowinfo: 0,
                addr,
            }),
        };
        Self { repr }
    }

    /// IPv4 "any" endpoint on `port`
    pub fn any_v4(port: u16) -> Self {
        Self::new(AddressV4::any(), port)
    }

    /// IPv6 "any" endpoint on `port`
    pub fn any_v6(port: u16) -> Self {
        Self::new(AddressV6::any(), port)
    }

    /// `127.0.0.1` on `port`
    pub fn localhost(port: u16) -> Self {
        Self::new(AddressV4::loopback(), port)
    }

    /// True for an IPv4 endpoint
    pub fn is_v4(&self) -> bool {
        matches!(self.repr, Repr::V4(_))
    }

    /// Family of the endpoint
    pub fn family(&self) -> AddressFamily {
        match self.repr {
            Repr::V4(_) => AddressFamily::Ipv4,
            Repr::V6(_) => AddressFamily::Ipv6,
        }
    }

    /// Port in host byte order
    pub fn port(&self) -> u16 {
        match self.repr {
            Repr::V4(sa) => u16::from_be(sa.port),
            Repr::V6(sa) => u16::from_be(sa.port),
        }
    }

    /// Replace the port; `port` is in host byte order
    pub fn set_port(&mut self, port: u16) {
        match &mut self.repr {
            Repr::V4(sa) => sa.port = port.to_be(),
            Repr::V6(sa) => sa.port = port.to_be(),
        }
    }

    /// Address part, without the port
    pub fn to_address(&self) -> Address {
        match self.repr {
            Repr::V4(sa) => Address::V4(sa.addr),
            Repr::V6(sa) => Address::V6(sa.addr),
        }
    }

    /// Byte length of the active platform socket-address structure
    pub fn size(&self) -> usize {
        match self.repr {
            Repr::V4(_) => sockaddr_in_len(),
            Repr::V6(_) => sockaddr_in6_len(),
        }
    }

    /// Byte length able to hold either family
    ///
    /// Use this as the buffer bound when the family is only known after the OS
    /// fills the buffer (e.g. on accept).
    pub fn capacity(&self) -> usize {
        sockaddr_in_len().max(sockaddr_in6_len())
    }

    /// Lend the platform socket address to `f`
    ///
    /// `SockAddr::as_ptr()` and `SockAddr::len()` are the pointer/length pair
    /// to hand to the OS. The view lives only for the call.
    pub fn with_sock_addr<R>(&self, f: impl FnOnce(&SockAddr) -> R) -> R {
        let raw = SockAddr::from(self.to_socket_addr());
        f(&raw)
    }

    /// Rebuild an endpoint from a socket address filled by the OS
    ///
    /// The family is taken from the buffer's family field.
    ///
    /// # Errors
    ///
    /// `NoMatchingAddressFamily` if the buffer holds neither `AF_INET` nor
    /// `AF_INET6`.
    pub fn from_sock_addr(raw: &SockAddr) -> Result<Self, NetworkError> {
        raw.as_socket()
            .map(Self::from)
            .ok_or_else(|| NetworkError::NoMatchingAddressFamily {
                input: format!("address family {}", raw.family()),
            })
    }

    /// Equivalent `std::net::SocketAddr`
    ///
    /// The private loopback scope id ([`LOOPBACK_SCOPE_ID`] on `::1`) is not an
    /// interface index and is sent to the OS as 0.
    pub fn to_socket_addr(&self) -> SocketAddr {
        match self.repr {
            Repr::V4(sa) => SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::from(sa.addr),
                u16::from_be(sa.port),
            )),
            Repr::V6(sa) => SocketAddr::V6(SocketAddrV6::new(
                Ipv6Addr::from(sa.addr),
                u16::from_be(sa.port),
                sa.flowinfo,
                os_scope_id(&sa.addr),
            )),
        }
    }
}

fn os_scope_id(addr: &AddressV6) -> u32 {
    if addr.is_loopback() && addr.scope_id() == LOOPBACK_SCOPE_ID {
        0
    } else {
        addr.scope_id()
    }
}

fn sockaddr_in_len() -> usize {
    SockAddr::from(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)).len() as usize
}

fn sockaddr_in6_len() -> usize {
    SockAddr::from(SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, 0, 0, 0)).len() as usize
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Self::new(AddressV4::from(*v4.ip()), v4.port()),
            SocketAddr::V6(v6) => Self {
                repr: Repr::V6(SockAddrIn6 {
                    port: v6.port().to_be(),
                    flowinfo: v6.flowinfo(),
                    addr: AddressV6::from(*v6.ip()).with_scope_id(v6.scope_id()),
                }),
            },
        }
    }
}

impl From<Endpoint> for SocketAddr {
    fn from(ep: Endpoint) -> Self {
        ep.to_socket_addr()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::V4(sa) => write!(f, "{}:{}", sa.addr, u16::from_be(sa.port)),
            Repr::V6(sa) => write!(f, "[{}]:{}", sa.addr, u16::from_be(sa.port)),
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({})", self)
    }
}

impl FromStr for Endpoint {
    type Err = NetworkError;

    /// Accepts `a.b.c.d:port` and `[v6]:port` (zone allowed inside the brackets)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NetworkError::InvalidAddressFormat {
            input: s.to_string(),
        };

        let (host, port) = match s.strip_prefix('[') {
            Some(rest) => {
                let (host, port) = rest.split_once("]:").ok_or_else(invalid)?;
                let v6: AddressV6 = host.parse().map_err(|_| invalid())?;
                (Address::V6(v6), port)
            }
            None => {
                let (host, port) = s.rsplit_once(':').ok_or_else(invalid)?;
                let v4: AddressV4 = host.parse().map_err(|_| invalid())?;
                (Address::V4(v4), port)
            }
        };
        let port: u16 = port.parse().map_err(|_| invalid())?;
        Ok(Self::new(host, port))
    }
}
