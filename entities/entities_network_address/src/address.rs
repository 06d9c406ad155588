//! Address Module
//!
//! Family-agnostic address: either an [`AddressV4`] or an [`AddressV6`]. Every
//! family-dependent method matches on the live variant.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::address_v4::AddressV4;
use crate::address_v6::AddressV6;
use crate::error::{ErrorSlot, NetworkError};

/// Address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4
    Ipv4,
    /// IPv6
    Ipv6,
}

/// IPv4 or IPv6 address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Address {
    /// IPv4 address
    V4(AddressV4),
    /// IPv6 address
    V6(AddressV6),
}

impl Default for Address {
    fn default() -> Self {
        Address::V4(AddressV4::any())
    }
}

impl Address {
    /// Family of the held address
    pub fn family(&self) -> AddressFamily {
        match self {
            Address::V4(_) => AddressFamily::Ipv4,
            Address::V6(_) => AddressFamily::Ipv6,
        }
    }

    /// True when holding an IPv4 address
    pub fn is_v4(&self) -> bool {
        matches!(self, Address::V4(_))
    }

    /// True when holding an IPv6 address
    pub fn is_v6(&self) -> bool {
        matches!(self, Address::V6(_))
    }

    /// Loopback check of the held family
    pub fn is_loopback(&self) -> bool {
        match self {
            Address::V4(v4) => v4.is_loopback(),
            Address::V6(v6) => v6.is_loopback(),
        }
    }

    /// Unspecified ("any") check of the held family
    pub fn is_unspecified(&self) -> bool {
        match self {
            Address::V4(v4) => v4.is_unspecified(),
            Address::V6(v6) => v6.is_unspecified(),
        }
    }

    /// The IPv4 address, or `0.0.0.0` when holding IPv6
    ///
    /// Check [`Address::is_v4`] first; the fallback is indistinguishable from a
    /// real "any" address.
    pub fn v4(&self) -> AddressV4 {
        match self {
            Address::V4(v4) => *v4,
            Address::V6(_) => AddressV4::default(),
        }
    }

    /// The IPv6 address, or `::` when holding IPv4
    pub fn v6(&self) -> AddressV6 {
        match self {
            Address::V4(_) => AddressV6::default(),
            Address::V6(v6) => *v6,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::V4(v4) => fmt::Display::fmt(v4, f),
            Address::V6(v6) => fmt::Display::fmt(v6, f),
        }
    }
}

impl FromStr for Address {
    type Err = NetworkError;

    /// Tries IPv4 first, then IPv6
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v4) = s.parse::<AddressV4>() {
            return Ok(Address::V4(v4));
        }
        s.parse::<AddressV6>()
            .map(Address::V6)
            .map_err(|_| NetworkError::NoMatchingAddressFamily {
                input: s.to_string(),
            })
    }
}

impl From<AddressV4> for Address {
    fn from(v4: AddressV4) -> Self {
        Address::V4(v4)
    }
}

impl From<AddressV6> for Address {
    fn from(v6: AddressV6) -> Self {
        Address::V6(v6)
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Address::V4(v4.into()),
            IpAddr::V6(v6) => Address::V6(v6.into()),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> Self {
        match addr {
            Address::V4(v4) => IpAddr::V4(v4.into()),
            Address::V6(v6) => IpAddr::V6(v6.into()),
        }
    }
}

/// Parse IPv4 or IPv6 text, returning `0.0.0.0` when neither matches
///
/// The placeholder cannot be told apart from a parsed "any" address; use
/// [`to_address_with_error`] or `str::parse` when that matters.
pub fn to_address(text: &str) -> Address {
    text.parse().unwrap_or_default()
}

/// Parse IPv4 or IPv6 text, recording the outcome in `error`
pub fn to_address_with_error(text: &str, error: &mut ErrorSlot) -> Address {
    error.record(|| text.parse()).unwrap_or_default()
}
