//! IPv6 Address Module
//!
//! 16-byte IPv6 address plus scope id. Comparison, ordering and hashing look at
//! the address bytes only; the scope id rides along.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::address_v4::{write_text, AddressV4};
use crate::error::{ErrorSlot, NetworkError};

/// Length of an IPv6 address in bytes
pub const IN6_ADDR_LEN: usize = 16;

/// Maximum colon-hex text length (`INET6_ADDRSTRLEN`)
pub const IN6_ADDR_STR_LEN: usize = 46;

/// Scope id attached to [`AddressV6::loopback`]
///
/// Library convention only; it does not correspond to any interface index the
/// OS reports.
pub const LOOPBACK_SCOPE_ID: u32 = 128;

/// IPv6 address
#[derive(Clone, Copy, Default)]
pub struct AddressV6 {
    octets: [u8; IN6_ADDR_LEN],
    scope_id: u32,
}

impl AddressV6 {
    /// Create from bytes in network byte order and a scope id
    pub const fn new(bytes: [u8; IN6_ADDR_LEN], scope_id: u32) -> Self {
        Self {
            octets: bytes,
            scope_id,
        }
    }

    /// Create from bytes in network byte order with scope id 0
    pub const fn from_bytes(bytes: [u8; IN6_ADDR_LEN]) -> Self {
        Self::new(bytes, 0)
    }

    /// `::`
    pub const fn any() -> Self {
        Self::from_bytes([0; IN6_ADDR_LEN])
    }

    /// `::1` with scope id [`LOOPBACK_SCOPE_ID`]
    pub const fn loopback() -> Self {
        let mut bytes = [0; IN6_ADDR_LEN];
        bytes[IN6_ADDR_LEN - 1] = 1;
        Self::new(bytes, LOOPBACK_SCOPE_ID)
    }

    /// `::ffff:a.b.c.d`
    pub fn to_v4_mapped(v4: AddressV4) -> Self {
        Self::from(Ipv4Addr::from(v4).to_ipv6_mapped())
    }

    /// Same address with another scope id
    pub const fn with_scope_id(self, scope_id: u32) -> Self {
        Self::new(self.octets, scope_id)
    }

    /// Bytes in network byte order
    pub const fn to_bytes(&self) -> [u8; IN6_ADDR_LEN] {
        self.octets
    }

    /// Scope (zone) id
    pub const fn scope_id(&self) -> u32 {
        self.scope_id
    }

    /// True for `::1`, whatever the scope id
    pub fn is_loopback(&self) -> bool {
        self.to_ipv6().is_loopback()
    }

    /// True for `::`
    pub fn is_unspecified(&self) -> bool {
        self.to_ipv6().is_unspecified()
    }

    /// True for `ff00::/8`
    pub fn is_multicast(&self) -> bool {
        self.octets[0] == 0xff
    }

    /// True for `fe80::/10`
    pub fn is_link_local(&self) -> bool {
        self.octets[0] == 0xfe && (self.octets[1] & 0xc0) == 0x80
    }

    /// True for `::ffff:0:0/96`
    pub fn is_v4_mapped(&self) -> bool {
        self.to_ipv6().to_ipv4_mapped().is_some()
    }

    /// Embedded IPv4 address of a v4-mapped address
    pub fn v4_mapped(&self) -> Option<AddressV4> {
        self.to_ipv6().to_ipv4_mapped().map(AddressV4::from)
    }

    /// Write the colon-hex form into `buf`
    ///
    /// # Errors
    ///
    /// `FormatBufferTooSmall` if `buf` cannot hold the text.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<usize, NetworkError> {
        write_text(self, buf)
    }

    fn to_ipv6(self) -> Ipv6Addr {
        Ipv6Addr::from(self.octets)
    }
}

impl PartialEq for AddressV6 {
    fn eq(&self, other: &Self) -> bool {
        self.octets == other.octets
    }
}

impl Eq for AddressV6 {}

impl PartialOrd for AddressV6 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AddressV6 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.octets.cmp(&other.octets)
    }
}

impl Hash for AddressV6 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.octets.hash(state);
    }
}

impl fmt::Display for AddressV6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_ipv6(), f)
    }
}

impl fmt::Debug for AddressV6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope_id == 0 {
            write!(f, "AddressV6({})", self)
        } else {
            write!(f, "AddressV6({}%{})", self, self.scope_id)
        }
    }
}

impl FromStr for AddressV6 {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NetworkError::InvalidAddressFormat {
            input: s.to_string(),
        };

        let (addr, zone) = match s.split_once('%') {
            Some((addr, zone)) => (addr, Some(zone)),
            None => (s, None),
        };
        let addr: Ipv6Addr = addr.parse().map_err(|_| invalid())?;
        let scope_id = match zone {
            None => 0,
            Some(zone) => parse_zone(zone).ok_or_else(invalid)?,
        };
        Ok(Self::new(addr.octets(), scope_id))
    }
}

/// Resolve a zone suffix to a scope id: a number, or an interface name on Unix
fn parse_zone(zone: &str) -> Option<u32> {
    if zone.is_empty() {
        return None;
    }
    if let Ok(id) = zone.parse::<u32>() {
        return Some(id);
    }
    interface_index(zone)
}

#[cfg(unix)]
fn interface_index(name: &str) -> Option<u32> {
    let name = std::ffi::CString::new(name).ok()?;
    // SAFETY: `name` is a valid NUL-terminated string for the duration of the call.
    let index = unsafe { libc::if_nametoindex(name.as_ptr()) };
    (index != 0).then_some(index)
}

#[cfg(not(unix))]
fn interface_index(_name: &str) -> Option<u32> {
    None
}

impl From<Ipv6Addr> for AddressV6 {
    fn from(addr: Ipv6Addr) -> Self {
        Self::from_bytes(addr.octets())
    }
}

impl From<AddressV6> for Ipv6Addr {
    fn from(addr: AddressV6) -> Self {
        addr.to_ipv6()
    }
}

impl From<[u8; IN6_ADDR_LEN]> for AddressV6 {
    fn from(bytes: [u8; IN6_ADDR_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

/// Parse colon-hex text, returning `::` on failure
pub fn to_address_v6(text: &str) -> AddressV6 {
    text.parse().unwrap_or_default()
}

/// Parse colon-hex text, recording the outcome in `error`
pub fn to_address_v6_with_error(text: &str, error: &mut ErrorSlot) -> AddressV6 {
    error.record(|| text.parse()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_loopback_constant() {
        let lo = AddressV6::loopback();
        assert!(lo.is_loopback());
        assert_eq!(lo.scope_id(), LOOPBACK_SCOPE_ID);
        assert_eq!(lo.to_string(), "::1");
    }

    #[test]
    fn test_parse_loopback() {
        let addr: AddressV6 = "::1".parse().unwrap();
        assert!(addr.is_loopback());
        assert_eq!(addr.scope_id(), 0);
        assert_eq!(addr, AddressV6::loopback());
    }

    #[test]
    fn test_scope_id_excluded_from_comparison() {
        let a = AddressV6::loopback().with_scope_id(1);
        let b = AddressV6::loopback().with_scope_id(2);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_bytewise_ordering() {
        let low: AddressV6 = "2001:db8::1".parse().unwrap();
        let high: AddressV6 = "2001:db8::2".parse().unwrap();
        let higher: AddressV6 = "fe80::1".parse().unwrap();
        assert!(low < high);
        assert!(high < higher);
        assert!(higher > low);
    }

    #[test]
    fn test_canonical_format() {
        let addr: AddressV6 = "2001:0db8:0000:0000:0000:0000:0000:0001".parse().unwrap();
        assert_eq!(addr.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_numeric_zone() {
        let addr: AddressV6 = "fe80::1%3".parse().unwrap();
        assert_eq!(addr.scope_id(), 3);
        assert!(addr.is_link_local());
        assert_eq!(addr.to_string(), "fe80::1");
    }

    #[test]
    fn test_bad_zone() {
        assert!("fe80::1%".parse::<AddressV6>().is_err());
        assert!("fe80::1%no-such-interface-xyz".parse::<AddressV6>().is_err());
    }

    #[test]
    fn test_invalid_text() {
        let err = "127.0.0.1".parse::<AddressV6>().unwrap_err();
        assert!(matches!(err, NetworkError::InvalidAddressFormat { .. }));
        assert_eq!(to_address_v6("zzz"), AddressV6::any());
    }

    #[test]
    fn test_parse_with_error_slot() {
        let mut slot = ErrorSlot::new();
        let addr = to_address_v6_with_error("::g", &mut slot);
        assert!(addr.is_unspecified());
        assert!(!slot.is_ok());

        let addr = to_address_v6_with_error("ff02::1", &mut slot);
        assert!(addr.is_multicast());
        assert!(slot.is_ok());
    }

    #[test]
    fn test_v4_mapped() {
        let mapped = AddressV6::to_v4_mapped(AddressV4::new(192, 0, 2, 7));
        assert!(mapped.is_v4_mapped());
        assert_eq!(mapped.v4_mapped(), Some(AddressV4::new(192, 0, 2, 7)));
        assert!(!AddressV6::loopback().is_v4_mapped());
    }

    #[test]
    fn test_write_to_buffer() {
        let addr: AddressV6 = "ffff:ffff:ffff:ffff:ffff:ffff:255.255.255.255".parse().unwrap();
        let mut buf = [0u8; IN6_ADDR_STR_LEN];
        let n = addr.write_to(&mut buf).unwrap();
        assert!(n <= IN6_ADDR_STR_LEN);

        let mut small = [0u8; 2];
        assert!(matches!(
            AddressV6::loopback().write_to(&mut small),
            Err(NetworkError::FormatBufferTooSmall { required: 3, available: 2 })
        ));
    }
}
