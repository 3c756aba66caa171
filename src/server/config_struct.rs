// Centralized knobs for the server and its worker pool.

use std::time::Duration;

/// Everything tunable about the front-end.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// Worker threads handling client connections.
    pub workers: usize,
    /// Connections allowed to wait for a worker before new ones are
    /// refused with a busy error.
    pub queue_capacity: usize,
    /// How long a worker waits on an idle client before hanging up.
    pub client_read_timeout: Duration,
    /// Longest command line accepted, in bytes.
    pub max_line_bytes: usize,
    /// Largest decoded WRITE payload accepted, in bytes.
    pub max_payload_bytes: usize,
    /// Commands one connection may issue before being cut off.
    pub max_commands: usize,
}

impl ServerConfig {
    /// Defaults sized for lots of short-lived clients.
    pub fn sensible_defaults(port: u16) -> ServerConfig {
        let cpus = std::thread::available_parallelism()
            .map(|count| count.get())
            .unwrap_or(2);
        ServerConfig {
            port,
            workers: (cpus * 2).max(4),
            queue_capacity: 1024,
            client_read_timeout: Duration::from_secs(60),
            // A maximal payload is 131070 hex digits; leave headroom for
            // the verb, the name, and stray whitespace.
            max_line_bytes: 2 * 65_535 + 64,
            max_payload_bytes: 65_535,
            max_commands: 10_000,
        }
    }
}
