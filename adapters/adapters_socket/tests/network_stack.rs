//! Network stack lifecycle
//!
//! Kept in its own test binary: it observes the process-wide stack state
//! before the first startup, which no other test may touch.

use adapters_socket::*;

#[test]
fn test_socket_requires_running_stack() {
    assert!(!NetworkStack::is_running());
    let err = SocketImpl::system(AddressFamily::Ipv4, SocketType::Stream).unwrap_err();
    assert!(matches!(err, NetworkError::StackNotRunning));

    NetworkStack::startup().unwrap();
    assert!(SocketImpl::system(AddressFamily::Ipv4, SocketType::Stream).is_ok());

    NetworkStack::shutdown();
    assert!(!NetworkStack::is_running());
    assert!(matches!(
        SocketImpl::system(AddressFamily::Ipv4, SocketType::Datagram),
        Err(NetworkError::StackNotRunning)
    ));
}
