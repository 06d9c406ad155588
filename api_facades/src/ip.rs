//! IP Facades
//!
//! Address model re-exports plus the internet protocol markers used to pick a
//! family when creating sockets.

pub use entities_network_address::address_v4::{AddressClass, IN4_ADDR_LEN, IN4_ADDR_STR_LEN};
pub use entities_network_address::address_v6::{IN6_ADDR_LEN, IN6_ADDR_STR_LEN, LOOPBACK_SCOPE_ID};
pub use entities_network_address::{
    to_address, to_address_v4, to_address_v4_with_error, to_address_v6, to_address_v6_with_error,
    to_address_with_error, Address, AddressFamily, AddressV4, AddressV6, Endpoint,
};

/// Internet protocol marker (IPv4 or IPv6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InternetProtocol {
    family: AddressFamily,
}

impl InternetProtocol {
    /// Address family of the protocol
    pub const fn family(&self) -> AddressFamily {
        self.family
    }

    /// Wildcard endpoint of this family on `port`
    pub fn any(&self, port: u16) -> Endpoint {
        match self.family {
            AddressFamily::Ipv4 => Endpoint::any_v4(port),
            AddressFamily::Ipv6 => Endpoint::any_v6(port),
        }
    }

    /// Loopback endpoint of this family on `port`
    pub fn loopback(&self, port: u16) -> Endpoint {
        match self.family {
            AddressFamily::Ipv4 => Endpoint::new(AddressV4::loopback(), port),
            AddressFamily::Ipv6 => Endpoint::new(AddressV6::loopback(), port),
        }
    }
}

/// IPv4
pub const fn v4() -> InternetProtocol {
    InternetProtocol {
        family: AddressFamily::Ipv4,
    }
}

/// IPv6
pub const fn v6() -> InternetProtocol {
    InternetProtocol {
        family: AddressFamily::Ipv6,
    }
}
