// The one lock in the whole volume.

use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

// Structs, Enums, Flags

/// A fair readers/writer lock.
///
/// `std::sync::RwLock` makes no fairness promise, so admission is ordered
/// here instead: every arrival takes a ticket and tickets are served
/// strictly in order, with consecutive readers admitted together. A queued
/// writer therefore holds up every later arrival until it has run, which
/// is what keeps a steady read load from starving writers (and the other
/// way around).
///
/// The inner `RwLock` only hands out the guarded references. By the time a
/// thread touches it, admission has already guaranteed the acquisition
/// cannot contend.
pub(crate) struct FairRwLock<T> {
    pub(super) order: Mutex<GateOrder>,
    pub(super) turnstile: Condvar,
    pub(super) inner: RwLock<T>,
}

/// The admission ledger.
#[derive(Debug)]
pub(super) struct GateOrder {
    /// Ticket the next arrival draws.
    pub(super) next_ticket: u64,
    /// Ticket currently allowed to step in.
    pub(super) now_serving: u64,
    /// Readers inside right now.
    pub(super) active_readers: usize,
    /// Whether a writer is inside right now.
    pub(super) writer_active: bool,
}

/// Shared access, released on drop.
pub(crate) struct ReadTurn<'a, T> {
    pub(super) gate: &'a FairRwLock<T>,
    /// Present from construction until drop.
    pub(super) guard: Option<RwLockReadGuard<'a, T>>,
}

/// Exclusive access, released on drop.
pub(crate) struct WriteTurn<'a, T> {
    pub(super) gate: &'a FairRwLock<T>,
    /// Present from construction until drop.
    pub(super) guard: Option<RwLockWriteGuard<'a, T>>,
}
