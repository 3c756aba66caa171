// The acceptor.

use std::sync::Arc;

use crate::server::config_struct::ServerConfig;
use crate::volume::manager::manager_struct::Volume;

/// The TCP front-end: an accept loop feeding a worker pool, all wrapped
/// around one shared volume.
pub struct FileServer {
    pub(super) volume: Arc<Volume>,
    pub(super) config: ServerConfig,
}
