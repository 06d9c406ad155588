//! Error Module
//!
//! Error taxonomy shared by the address model and the socket adapters, plus the
//! out-of-band [`ErrorSlot`] used by the `*_with_error` operation variants.

use std::io;

/// Errors produced by address parsing, formatting and socket operations
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Text does not parse as an address of the requested family
    #[error("invalid address format: {input:?}")]
    InvalidAddressFormat {
        /// The rejected text.
        input: String,
    },

    /// Text parses as neither an IPv4 nor an IPv6 address
    #[error("no matching address family for {input:?}")]
    NoMatchingAddressFamily {
        /// The rejected text.
        input: String,
    },

    /// Formatting buffer is shorter than the textual form
    #[error("format buffer too small: need {required} bytes, have {available}")]
    FormatBufferTooSmall {
        /// Bytes needed for the text.
        required: usize,
        /// Bytes offered by the caller.
        available: usize,
    },

    /// The OS refused to create a socket
    #[error("socket creation failed: {0}")]
    SocketCreateFailed(#[source] io::Error),

    /// bind() failed
    #[error("bind failed: {0}")]
    BindFailed(#[source] io::Error),

    /// listen() failed
    #[error("listen failed: {0}")]
    ListenFailed(#[source] io::Error),

    /// connect() failed
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] io::Error),

    /// accept() failed
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] io::Error),

    /// send() or recv() reported an error
    #[error("transfer failed: {0}")]
    TransferFailed(#[source] io::Error),

    /// The OS could not report the socket's local address
    #[error("local address query failed: {0}")]
    AddressQueryFailed(#[source] io::Error),

    /// The socket handle was released or moved out
    #[error("invalid socket handle")]
    InvalidHandle,

    /// A socket was requested before the network stack was started
    #[error("network stack not running")]
    StackNotRunning,
}

impl NetworkError {
    /// Platform error code carried by the underlying OS error, if any
    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_error().and_then(io::Error::raw_os_error)
    }

    /// Underlying OS error for socket-level variants
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            NetworkError::SocketCreateFailed(e)
            | NetworkError::BindFailed(e)
            | NetworkError::ListenFailed(e)
            | NetworkError::ConnectFailed(e)
            | NetworkError::AcceptFailed(e)
            | NetworkError::TransferFailed(e)
            | NetworkError::AddressQueryFailed(e) => Some(e),
            _ => None,
        }
    }

    /// True for both address-parse failures
    ///
    /// An address-level parse reports [`NetworkError::NoMatchingAddressFamily`]
    /// once both families were tried, which is still a malformed-address
    /// condition from the caller's point of view.
    pub fn is_invalid_address(&self) -> bool {
        matches!(
            self,
            NetworkError::InvalidAddressFormat { .. } | NetworkError::NoMatchingAddressFamily { .. }
        )
    }
}

/// Out-of-band error slot
///
/// Every fallible operation has a sibling that reports through a slot instead of
/// a `Result`: success clears the slot, failure stores the error.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    error: Option<NetworkError>,
}

impl ErrorSlot {
    /// Create an empty (no error) slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to "no error"
    pub fn clear(&mut self) {
        self.error = None;
    }

    /// Store an error, replacing any previous one
    pub fn set(&mut self, error: NetworkError) {
        self.error = Some(error);
    }

    /// True when the last recorded operation succeeded
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The recorded error, if any
    pub fn error(&self) -> Option<&NetworkError> {
        self.error.as_ref()
    }

    /// Take the recorded error out of the slot
    pub fn take(&mut self) -> Option<NetworkError> {
        self.error.take()
    }

    /// Numeric code: 0 on success, the OS code when one exists, otherwise -1
    pub fn code(&self) -> i32 {
        match &self.error {
            None => 0,
            Some(e) => e.raw_os_error().unwrap_or(-1),
        }
    }

    /// Run `op` and record its outcome in the slot
    ///
    /// Returns the success value, or `None` after storing the error.
    pub fn record<T, F>(&mut self, op: F) -> Option<T>
    where
        F: FnOnce() -> Result<T, NetworkError>,
    {
        match op() {
            Ok(value) => {
                self.clear();
                Some(value)
            }
            Err(e) => {
                self.set(e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_clear() {
        let slot = ErrorSlot::new();
        assert!(slot.is_ok());
        assert_eq!(slot.code(), 0);
        assert!(slot.error().is_none());
    }

    #[test]
    fn test_record_success_clears_previous_error() {
        let mut slot = ErrorSlot::new();
        slot.set(NetworkError::InvalidHandle);
        assert!(!slot.is_ok());

        let value = slot.record(|| Ok::<_, NetworkError>(7));
        assert_eq!(value, Some(7));
        assert!(slot.is_ok());
    }

    #[test]
    fn test_record_failure_populates_slot() {
        let mut slot = ErrorSlot::new();
        let value: Option<()> = slot.record(|| {
            Err(NetworkError::TransferFailed(io::Error::from_raw_os_error(104)))
        });
        assert!(value.is_none());
        assert_eq!(slot.code(), 104);
        assert!(matches!(slot.error(), Some(NetworkError::TransferFailed(_))));
    }

    #[test]
    fn test_code_without_os_error() {
        let mut slot = ErrorSlot::new();
        slot.set(NetworkError::InvalidAddressFormat {
            input: "x".to_string(),
        });
        assert_eq!(slot.code(), -1);
        assert!(slot.take().is_some());
        assert!(slot.is_ok());
    }

    #[test]
    fn test_is_invalid_address() {
        let bad = NetworkError::NoMatchingAddressFamily {
            input: "nope".to_string(),
        };
        assert!(bad.is_invalid_address());
        assert!(!NetworkError::InvalidHandle.is_invalid_address());
    }

    #[test]
    fn test_display() {
        let err = NetworkError::FormatBufferTooSmall {
            required: 15,
            available: 4,
        };
        assert_eq!(
            err.to_string(),
            "format buffer too small: need 15 bytes, have 4"
        );
    }
}
