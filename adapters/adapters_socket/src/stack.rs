//! Network Stack Module
//!
//! Process-wide startup and shutdown of the platform socket layer. Sockets
//! obtained through [`SocketImpl::system`](crate::SocketImpl::system) require a
//! running stack.

use std::sync::{Mutex, PoisonError};

use entities_network_address::NetworkError;
use tracing::{debug, info};

static RUNNING: Mutex<bool> = Mutex::new(false);

/// Explicit lifecycle handle for the platform socket layer
pub struct NetworkStack;

impl NetworkStack {
    /// Start the socket layer
    ///
    /// Idempotent: a second call while running is a no-op.
    ///
    /// # Returns
    /// * `Err(NetworkError::SocketCreateFailed)` - the platform layer could not be initialised
    pub fn startup() -> Result<(), NetworkError> {
        let mut running = RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
        if *running {
            debug!("network stack already running");
            return Ok(());
        }

        platform_startup()?;
        *running = true;
        info!("network stack started");
        Ok(())
    }

    /// Stop the socket layer
    ///
    /// Sockets created afterwards through the checked constructors fail with
    /// [`NetworkError::StackNotRunning`]. Existing sockets are unaffected.
    ///
    /// Only the running flag changes: on Windows, WSA stays initialised until
    /// the process exits.
    pub fn shutdown() {
        let mut running = RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
        if *running {
            *running = false;
            info!("network stack stopped");
        }
    }

    /// Whether [`NetworkStack::startup`] has run without a later shutdown
    pub fn is_running() -> bool {
        *RUNNING.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `Err(StackNotRunning)` unless the stack is running
    pub fn ensure_running() -> Result<(), NetworkError> {
        if Self::is_running() {
            Ok(())
        } else {
            Err(NetworkError::StackNotRunning)
        }
    }
}

/// Windows needs WSAStartup before the first socket call; std/socket2 perform
/// it on the first socket they create, so creating one throwaway socket is enough.
#[cfg(windows)]
fn platform_startup() -> Result<(), NetworkError> {
    use socket2::{Domain, Socket, Type};

    Socket::new(Domain::IPV4, Type::STREAM, None)
        .map(drop)
        .map_err(NetworkError::SocketCreateFailed)
}

#[cfg(not(windows))]
fn platform_startup() -> Result<(), NetworkError> {
    Ok(())
}
