use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running server. Dropping the handle without calling [`close`](Self::close)
/// also stops the accept loop, but does not wait for it.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn new(local_addr: SocketAddr, shutdown: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            local_addr,
            shutdown,
            task,
        }
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting, drops open connections and waits for the server task.
    pub async fn close(self) {
        // The task may already be gone, in which case there is nothing to signal.
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            log::warn!("Server task on {} ended abnormally: {e}", self.local_addr);
        }
        log::debug!("Server on {} closed", self.local_addr);
    }
}
