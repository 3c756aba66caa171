// The worker pool. Fixed threads, bounded queue, refuse when full.

use std::net::TcpStream;
use std::sync::mpsc::SyncSender;

/// Fixed pool of named worker threads fed through a bounded channel.
///
/// The bound is the backpressure: when every worker is busy and the queue
/// is full, `submit` refuses immediately instead of letting connections
/// pile up without limit. Workers live until the send side of the queue is
/// dropped.
pub(crate) struct WorkerPool {
    pub(super) queue: SyncSender<TcpStream>,
}
