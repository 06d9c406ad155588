//! IPv4 Address Module
//!
//! Fixed-size IPv4 address stored in network byte order, with dotted-decimal
//! parsing and formatting and the legacy classful classification helpers.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{ErrorSlot, NetworkError};

/// Length of an IPv4 address in bytes
pub const IN4_ADDR_LEN: usize = 4;

/// Maximum dotted-decimal text length (`INET_ADDRSTRLEN`)
pub const IN4_ADDR_STR_LEN: usize = 16;

/// Classful address class derived from the first octet
///
/// Legacy classful addressing; kept for compatibility, not CIDR-aware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressClass {
    /// 0.x.x.x
    This,
    /// 127.x.x.x
    Loopback,
    /// First octet below 126
    A,
    /// First octet below 193
    B,
    /// First octet below 225
    C,
    /// First octet below 241 (multicast)
    D,
    /// Everything above
    E,
}

const MASK_A: u32 = 0xFF00_0000;
const MASK_B: u32 = 0xFFFF_0000;
const MASK_C: u32 = 0xFFFF_FF00;

/// IPv4 address
///
/// The four bytes are kept in network byte order. Comparisons use the host-order
/// integer value, which orders exactly like the network-order bytes.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressV4 {
    octets: [u8; IN4_ADDR_LEN],
}

impl AddressV4 {
    /// Create from four octets (`a.b.c.d`)
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self {
            octets: [a, b, c, d],
        }
    }

    /// Create from bytes in network byte order
    pub const fn from_bytes(bytes: [u8; IN4_ADDR_LEN]) -> Self {
        Self { octets: bytes }
    }

    /// Create from an integer in host byte order
    pub const fn from_uint(value: u32) -> Self {
        Self {
            octets: value.to_be_bytes(),
        }
    }

    /// `0.0.0.0`
    pub const fn any() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// `127.0.0.1`
    pub const fn loopback() -> Self {
        Self::new(127, 0, 0, 1)
    }

    /// `255.255.255.255`
    pub const fn broadcast() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Bytes in network byte order
    pub const fn to_bytes(&self) -> [u8; IN4_ADDR_LEN] {
        self.octets
    }

    /// Integer value in host byte order
    pub const fn to_uint(&self) -> u32 {
        u32::from_be_bytes(self.octets)
    }

    /// True for `127.0.0.1`
    pub fn is_loopback(&self) -> bool {
        *self == Self::loopback()
    }

    /// True for `0.0.0.0`
    pub fn is_unspecified(&self) -> bool {
        self.to_uint() == 0
    }

    /// True for `255.255.255.255`
    pub fn is_broadcast(&self) -> bool {
        *self == Self::broadcast()
    }

    /// True for class D addresses
    pub fn is_multicast(&self) -> bool {
        self.address_class() == AddressClass::D
    }

    /// Classful address class of the first octet
    pub fn address_class(&self) -> AddressClass {
        match self.octets[0] {
            0 => AddressClass::This,
            127 => AddressClass::Loopback,
            b if b < 126 => AddressClass::A,
            b if b < 193 => AddressClass::B,
            b if b < 225 => AddressClass::C,
            b if b < 241 => AddressClass::D,
            _ => AddressClass::E,
        }
    }

    /// Classful network part, host byte order
    ///
    /// Class A keeps the first octet, class B the first two and every other
    /// class the first three.
    pub fn network_address(&self) -> u32 {
        let mask = match self.address_class() {
            AddressClass::A => MASK_A,
            AddressClass::B => MASK_B,
            _ => MASK_C,
        };
        self.to_uint() & mask
    }

    /// Write the dotted-decimal form into `buf`
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// `FormatBufferTooSmall` if `buf` cannot hold the text.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<usize, NetworkError> {
        write_text(self, buf)
    }
}

impl fmt::Display for AddressV4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl fmt::Debug for AddressV4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AddressV4({})", self)
    }
}

impl FromStr for AddressV4 {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Self::from)
            .map_err(|_| NetworkError::InvalidAddressFormat {
                input: s.to_string(),
            })
    }
}

impl From<Ipv4Addr> for AddressV4 {
    fn from(addr: Ipv4Addr) -> Self {
        Self::from_bytes(addr.octets())
    }
}

impl From<AddressV4> for Ipv4Addr {
    fn from(addr: AddressV4) -> Self {
        Ipv4Addr::from(addr.octets)
    }
}

impl From<[u8; IN4_ADDR_LEN]> for AddressV4 {
    fn from(bytes: [u8; IN4_ADDR_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<u32> for AddressV4 {
    fn from(value: u32) -> Self {
        Self::from_uint(value)
    }
}

/// Parse dotted-decimal text, returning `0.0.0.0` on failure
pub fn to_address_v4(text: &str) -> AddressV4 {
    text.parse().unwrap_or_default()
}

/// Parse dotted-decimal text, recording the outcome in `error`
///
/// On failure the returned value is `0.0.0.0` and the slot holds
/// `InvalidAddressFormat`.
pub fn to_address_v4_with_error(text: &str, error: &mut ErrorSlot) -> AddressV4 {
    error.record(|| text.parse()).unwrap_or_default()
}

/// Format `value` into a fixed caller buffer
pub(crate) fn write_text<T: fmt::Display>(value: &T, buf: &mut [u8]) -> Result<usize, NetworkError> {
    let text = value.to_string();
    let len = text.len();
    if len > buf.len() {
        return Err(NetworkError::FormatBufferTooSmall {
            required: len,
            available: buf.len(),
        });
    }
    buf[..len].copy_from_slice(text.as_bytes());
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_round_trip() {
        for text in ["0.0.0.0", "127.0.0.1", "192.168.1.100", "255.255.255.255"] {
            let addr: AddressV4 = text.parse().unwrap();
            assert_eq!(addr.to_string(), text);
        }
    }

    #[test]
    fn test_bytes_round_trip() {
        let bytes = [10, 20, 30, 40];
        assert_eq!(AddressV4::from_bytes(bytes).to_bytes(), bytes);
    }

    #[test]
    fn test_uint_is_host_order() {
        let addr = AddressV4::from_uint(0x7F00_0001);
        assert_eq!(addr.to_bytes(), [127, 0, 0, 1]);
        assert_eq!(addr.to_uint(), 0x7F00_0001);
        assert!(addr.is_loopback());
    }

    #[test]
    fn test_loopback() {
        assert!(AddressV4::loopback().is_loopback());
        assert!(!AddressV4::from_bytes([8, 8, 8, 8]).is_loopback());
    }

    #[test]
    fn test_ordering_follows_integer_value() {
        let a = AddressV4::new(1, 255, 255, 255);
        let b = AddressV4::new(2, 0, 0, 0);
        let c = AddressV4::new(2, 0, 0, 1);
        assert!(a < b && b < c && a < c);
        assert!(c > a);
        assert_eq!(a.cmp(&a), std::cmp::Ordering::Equal);
        assert_eq!(a < b, a.to_uint() < b.to_uint());
    }

    #[test]
    fn test_ordering_trichotomy() {
        let samples = [
            AddressV4::any(),
            AddressV4::new(9, 9, 9, 9),
            AddressV4::new(10, 0, 0, 1),
            AddressV4::loopback(),
            AddressV4::broadcast(),
        ];
        for a in samples {
            for b in samples {
                let holds = [a < b, a == b, a > b].iter().filter(|x| **x).count();
                assert_eq!(holds, 1, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_address_class() {
        assert_eq!(AddressV4::new(0, 1, 2, 3).address_class(), AddressClass::This);
        assert_eq!(AddressV4::new(10, 0, 0, 1).address_class(), AddressClass::A);
        assert_eq!(AddressV4::new(127, 0, 0, 1).address_class(), AddressClass::Loopback);
        assert_eq!(AddressV4::new(126, 0, 0, 1).address_class(), AddressClass::B);
        assert_eq!(AddressV4::new(172, 16, 0, 1).address_class(), AddressClass::B);
        assert_eq!(AddressV4::new(192, 168, 0, 1).address_class(), AddressClass::B);
        assert_eq!(AddressV4::new(193, 0, 0, 1).address_class(), AddressClass::C);
        assert_eq!(AddressV4::new(224, 0, 0, 1).address_class(), AddressClass::C);
        assert_eq!(AddressV4::new(225, 0, 0, 1).address_class(), AddressClass::D);
        assert_eq!(AddressV4::new(241, 0, 0, 1).address_class(), AddressClass::E);
    }

    #[test]
    fn test_multicast() {
        assert!(AddressV4::new(230, 1, 2, 3).is_multicast());
        assert!(!AddressV4::new(8, 8, 8, 8).is_multicast());
    }

    #[test]
    fn test_network_address() {
        assert_eq!(AddressV4::new(10, 1, 2, 3).network_address(), 0x0A00_0000);
        assert_eq!(AddressV4::new(150, 1, 2, 3).network_address(), 0x9601_0000);
        assert_eq!(AddressV4::new(200, 1, 2, 3).network_address(), 0xC801_0200);
    }

    #[test]
    fn test_invalid_text() {
        let err = "not-an-ip".parse::<AddressV4>().unwrap_err();
        assert!(matches!(err, NetworkError::InvalidAddressFormat { .. }));
        assert!("1.2.3".parse::<AddressV4>().is_err());
        assert!("256.1.1.1".parse::<AddressV4>().is_err());
    }

    #[test]
    fn test_silent_parse_returns_zero_value() {
        assert_eq!(to_address_v4("garbage"), AddressV4::any());
        assert_eq!(to_address_v4("8.8.4.4"), AddressV4::new(8, 8, 4, 4));
    }

    #[test]
    fn test_parse_with_error_slot() {
        let mut slot = ErrorSlot::new();
        let addr = to_address_v4_with_error("::1", &mut slot);
        assert_eq!(addr, AddressV4::any());
        assert!(matches!(slot.error(), Some(NetworkError::InvalidAddressFormat { .. })));

        let addr = to_address_v4_with_error("1.2.3.4", &mut slot);
        assert_eq!(addr, AddressV4::new(1, 2, 3, 4));
        assert!(slot.is_ok());
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buf = [0u8; IN4_ADDR_STR_LEN];
        let n = AddressV4::broadcast().write_to(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"255.255.255.255");

        let mut small = [0u8; 4];
        let err = AddressV4::loopback().write_to(&mut small).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::FormatBufferTooSmall { required: 9, available: 4 }
        ));
    }

    #[test]
    fn test_std_conversions() {
        let std_addr = Ipv4Addr::new(192, 0, 2, 1);
        let addr = AddressV4::from(std_addr);
        assert_eq!(Ipv4Addr::from(addr), std_addr);
    }
}
