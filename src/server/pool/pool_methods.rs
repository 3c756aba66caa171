// Feeding connections to workers.

// Imports

use std::io;
use std::net::TcpStream;
use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::TrySendError;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::thread;

use log::trace;

use crate::server::config_struct::ServerConfig;
use crate::server::handler;
use crate::volume::manager::manager_struct::Volume;

use super::pool_struct::WorkerPool;

// Implementations

impl WorkerPool {
    /// Spin up the workers.
    pub(crate) fn start(volume: Arc<Volume>, config: &ServerConfig) -> io::Result<WorkerPool> {
        let (queue, feed) = mpsc::sync_channel(config.queue_capacity);
        let feed = Arc::new(Mutex::new(feed));

        for number in 1..=config.workers {
            let feed = Arc::clone(&feed);
            let volume = Arc::clone(&volume);
            let config = config.clone();
            // Named threads make thread dumps legible.
            let _worker = thread::Builder::new()
                .name(format!("client-worker-{number}"))
                .spawn(move || worker_loop(&feed, &volume, &config))?;
        }
        Ok(WorkerPool { queue })
    }

    /// Hand a connection to the next free worker. On refusal the stream
    /// comes back so the caller can break the bad news to the client.
    pub(crate) fn submit(&self, stream: TcpStream) -> Result<(), TcpStream> {
        self.queue.try_send(stream).map_err(|refused| match refused {
            TrySendError::Full(stream) => stream,
            TrySendError::Disconnected(stream) => stream,
        })
    }
}

// Functions

fn worker_loop(feed: &Mutex<Receiver<TcpStream>>, volume: &Volume, config: &ServerConfig) {
    loop {
        // One worker at a time camps on the queue; the rest wait their
        // turn at the mutex. Either way the next connection goes to
        // whichever worker is free.
        let next = {
            feed.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .recv()
        };
        match next {
            Ok(stream) => handler::handle_connection(stream, volume, config),
            Err(_closed) => {
                trace!("Queue closed, worker exiting");
                return;
            }
        }
    }
}
