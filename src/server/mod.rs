pub mod handle;
pub mod status_app;

use std::future::Future;
use std::io;
use std::net::SocketAddr;

pub use handle::ServerHandle;
pub use status_app::StatusApp;

/// The application under test: told to listen on an address, it hands back a
/// [`ServerHandle`] once it accepts connections. [`StatusApp`] is the bundled one.
pub trait App {
    /// Starts serving on `addr`. The returned future resolves once the
    /// listener is bound, which is the readiness signal for the probe.
    fn listen(&self, addr: SocketAddr) -> impl Future<Output = io::Result<ServerHandle>> + Send;
}
