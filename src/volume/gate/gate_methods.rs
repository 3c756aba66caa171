// Tickets in, guards out.

// Imports

use std::ops::Deref;
use std::ops::DerefMut;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::RwLock;

use super::gate_struct::FairRwLock;
use super::gate_struct::GateOrder;
use super::gate_struct::ReadTurn;
use super::gate_struct::WriteTurn;

// Implementations

impl<T> FairRwLock<T> {
    pub(crate) fn new(value: T) -> FairRwLock<T> {
        FairRwLock {
            order: Mutex::new(GateOrder {
                next_ticket: 0,
                now_serving: 0,
                active_readers: 0,
                writer_active: false,
            }),
            turnstile: Condvar::new(),
            inner: RwLock::new(value),
        }
    }

    /// Take a shared turn. Blocks behind every earlier arrival, including
    /// queued writers; runs alongside adjacent readers.
    pub(crate) fn read(&self) -> ReadTurn<'_, T> {
        let mut order = admission(&self.order);
        let ticket = order.next_ticket;
        order.next_ticket += 1;

        while order.now_serving != ticket || order.writer_active {
            order = self
                .turnstile
                .wait(order)
                .unwrap_or_else(PoisonError::into_inner);
        }
        order.now_serving += 1;
        order.active_readers += 1;
        drop(order);
        // The next ticket may belong to a reader that can come in with us.
        self.turnstile.notify_all();

        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        ReadTurn {
            gate: self,
            guard: Some(guard),
        }
    }

    /// Take an exclusive turn. Blocks behind every earlier arrival, then
    /// waits for the readers already inside to drain.
    pub(crate) fn write(&self) -> WriteTurn<'_, T> {
        let mut order = admission(&self.order);
        let ticket = order.next_ticket;
        order.next_ticket += 1;

        while order.now_serving != ticket || order.writer_active || order.active_readers > 0 {
            order = self
                .turnstile
                .wait(order)
                .unwrap_or_else(PoisonError::into_inner);
        }
        order.now_serving += 1;
        order.writer_active = true;
        drop(order);

        let guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        WriteTurn {
            gate: self,
            guard: Some(guard),
        }
    }
}

impl<T> Deref for ReadTurn<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.guard.as_ref().expect("guard is present until drop")
    }
}

impl<T> Drop for ReadTurn<'_, T> {
    fn drop(&mut self) {
        // Hand the data guard back before touching the ledger, so a writer
        // woken below never trips over our inner guard.
        drop(self.guard.take());
        let mut order = admission(&self.gate.order);
        order.active_readers -= 1;
        drop(order);
        self.gate.turnstile.notify_all();
    }
}

impl<T> Deref for WriteTurn<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.guard.as_ref().expect("guard is present until drop")
    }
}

impl<T> DerefMut for WriteTurn<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.guard.as_mut().expect("guard is present until drop")
    }
}

impl<T> Drop for WriteTurn<'_, T> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut order = admission(&self.gate.order);
        order.writer_active = false;
        drop(order);
        self.gate.turnstile.notify_all();
    }
}

// Functions

/// Lock the ledger, shrugging off poison: the ledger holds plain counters
/// that are never left mid-update.
fn admission(order: &Mutex<GateOrder>) -> MutexGuard<'_, GateOrder> {
    order.lock().unwrap_or_else(PoisonError::into_inner)
}
