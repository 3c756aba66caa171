// Accepting connections and handing them off.

// Imports

use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use log::debug;
use log::info;
use log::warn;

use crate::server::config_struct::ServerConfig;
use crate::server::handler;
use crate::server::pool::pool_struct::WorkerPool;
use crate::volume::manager::manager_struct::Volume;

use super::server_struct::FileServer;

// Implementations

impl FileServer {
    pub fn new(volume: Arc<Volume>, config: ServerConfig) -> FileServer {
        FileServer { volume, config }
    }

    /// Bind the configured port and serve until the listener dies.
    pub fn start(self) -> io::Result<()> {
        let listener = TcpListener::bind(("0.0.0.0", self.config.port))?;
        self.serve(listener)
    }

    /// Serve on an already-bound listener. Useful when the caller wants an
    /// ephemeral port.
    pub fn serve(self, listener: TcpListener) -> io::Result<()> {
        serve_connections(self, listener)
    }
}

// Functions

fn serve_connections(server: FileServer, listener: TcpListener) -> io::Result<()> {
    let pool = WorkerPool::start(Arc::clone(&server.volume), &server.config)?;
    info!(
        "Listening on {} | {} worker(s) | queue {}",
        listener.local_addr()?,
        server.config.workers,
        server.config.queue_capacity
    );

    loop {
        let (stream, peer) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(failed) => {
                // Transient accept failures (out of descriptors, aborted
                // handshakes) should not take the server down.
                warn!("Accept failed: {failed}");
                continue;
            }
        };
        debug!("Accepted {peer}");

        if let Err(refused) = pool.submit(stream) {
            warn!("Pool saturated, refusing {peer}");
            handler::respond_and_close(refused, "ERROR server busy, try again later");
        }
    }
}
