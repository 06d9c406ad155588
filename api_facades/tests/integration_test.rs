//! Integration tests for api_facades crate
//!
//! End-to-end scenarios through the public `ip` and `socket` namespaces.

use api_facades::ip::{self, Address, AddressClass, AddressV4, AddressV6, Endpoint};
use api_facades::socket::{self, NetworkStack, SocketConfig};
use api_facades::{ErrorSlot, NetworkError};
use std::collections::BTreeSet;
use std::thread;

#[test]
fn test_v4_text_to_endpoint() {
    let address = ip::to_address("192.168.1.10");
    assert!(address.is_v4());
    assert_eq!(address.to_string(), "192.168.1.10");

    let endpoint = Endpoint::new(address, 8080);
    assert!(endpoint.is_v4());
    assert_eq!(endpoint.port(), 8080);
    assert_eq!(endpoint.to_address(), address);
}

#[test]
fn test_v6_loopback_endpoint() {
    let address = ip::to_address("::1");
    assert!(!address.is_v4());
    assert!(address.is_loopback());

    let endpoint = Endpoint::new(address, 443);
    assert_eq!(endpoint.size(), endpoint.capacity());
    assert_eq!(endpoint.to_string(), "[::1]:443");
}

#[test]
fn test_invalid_text_reports_through_slot() {
    let mut error = ErrorSlot::new();
    let address = ip::to_address_with_error("not-an-ip", &mut error);
    assert_eq!(address, Address::V4(AddressV4::any()));
    assert!(error.error().map_or(false, NetworkError::is_invalid_address));

    let v4 = ip::to_address_v4_with_error("300.1.1.1", &mut error);
    assert_eq!(v4, AddressV4::any());
    assert!(matches!(
        error.error(),
        Some(NetworkError::InvalidAddressFormat { .. })
    ));
}

#[test]
fn test_classful_ranges() {
    assert_eq!(AddressV4::new(10, 1, 2, 3).address_class(), AddressClass::A);
    assert_eq!(AddressV4::new(172, 16, 0, 1).address_class(), AddressClass::B);
    assert_eq!(AddressV4::new(192, 168, 0, 1).address_class(), AddressClass::B);
    assert_eq!(AddressV4::new(200, 1, 1, 1).address_class(), AddressClass::C);
    assert_eq!(AddressV4::new(230, 0, 0, 1).address_class(), AddressClass::D);
    assert_eq!(AddressV4::new(250, 0, 0, 1).address_class(), AddressClass::E);
    assert_eq!(
        AddressV4::new(172, 16, 9, 9).network_address(),
        AddressV4::new(172, 16, 0, 0).to_uint()
    );
}

#[test]
fn test_addresses_as_set_keys() {
    let set: BTreeSet<AddressV4> = ["10.0.0.2", "10.0.0.1", "9.255.255.255", "10.0.0.1"]
        .iter()
        .map(|text| ip::to_address_v4(text))
        .collect();
    let ordered: Vec<String> = set.iter().map(ToString::to_string).collect();
    assert_eq!(ordered, ["9.255.255.255", "10.0.0.1", "10.0.0.2"]);

    let scoped: AddressV6 = "fe80::1%3".parse().unwrap();
    assert_eq!(scoped, ip::to_address_v6("fe80::1"));
    assert_eq!(scoped.scope_id(), 3);
}

#[test]
fn test_socket_round_trip_through_facades() {
    NetworkStack::startup().unwrap();
    let config = SocketConfig::default().with_chunk_size(16);
    let mut server = socket::stream_with_config(ip::v4(), config).unwrap();
    server.open(&ip::v4().loopback(0)).unwrap();
    let endpoint = server.local_endpoint().unwrap();

    let client = thread::spawn(move || {
        let socket = socket::stream(ip::v4()).unwrap();
        socket.connect(&endpoint).unwrap();
        socket.write("GET / HTTP/1.0\r\n\r\n").unwrap();
    });

    let (mut peer, _) = server.accept().unwrap();
    let mut request_line = Vec::new();
    assert!(peer.read_until(&mut request_line, b'\r').unwrap());
    assert_eq!(request_line, b"GET / HTTP/1.0");
    client.join().unwrap();
}

#[test]
fn test_datagram_through_facades() {
    NetworkStack::startup().unwrap();
    let socket = socket::datagram(ip::v4()).unwrap();
    assert!(socket.is_valid());
}
