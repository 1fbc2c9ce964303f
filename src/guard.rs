//! Single-flight guard for expensive request families.
//!
//! A guard is either idle or has exactly one outstanding flight. Callers
//! hold a [`FlightPermit`] for the lifetime of their request; dropping it on
//! any exit path (success, error, early return) puts the guard back to idle,
//! so a failed request can never wedge it.

use futures::channel::oneshot;
use futures::future::FutureExt;
use futures::Future;
use log::debug;
use std::cell::{Cell, RefCell};
use std::fmt;

/// What happens to an invocation that arrives while a flight is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardPolicy {
    /// The new invocation is dropped; the pending one runs to completion.
    #[default]
    DropNewest,
    /// The pending flight is abandoned and the new invocation takes over.
    SupersedePending,
}

/// Returned by [`InFlightGuard::try_acquire`] while a flight is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardRejection {
    pub guard: &'static str,
}

impl fmt::Display for GuardRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is already running", self.guard)
    }
}

impl std::error::Error for GuardRejection {}

enum GuardState {
    Idle,
    Pending { flight: u64, cancel: oneshot::Sender<()> },
}

pub struct InFlightGuard {
    name: &'static str,
    state: RefCell<GuardState>,
    next_flight: Cell<u64>,
}

impl fmt::Debug for InFlightGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlightGuard")
            .field("name", &self.name)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl InFlightGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RefCell::new(GuardState::Idle),
            next_flight: Cell::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.state.borrow(), GuardState::Pending { .. })
    }

    /// `Idle -> Pending`, or a rejection if a flight is already outstanding.
    pub fn try_acquire(&self) -> Result<FlightPermit<'_>, GuardRejection> {
        if self.is_pending() {
            debug!("{} is already running", self.name);
            return Err(GuardRejection { guard: self.name });
        }
        Ok(self.begin())
    }

    /// Abandon any outstanding flight and start a new one.
    pub fn supersede(&self) -> FlightPermit<'_> {
        if self.cancel_pending() {
            debug!("{}: superseded pending flight", self.name);
        }
        self.begin()
    }

    /// Abandon the outstanding flight, if any, and return to idle.
    ///
    /// The abandoned permit's [`FlightPermit::cancelled`] future resolves.
    pub fn cancel_pending(&self) -> bool {
        let previous = self.state.replace(GuardState::Idle);
        match previous {
            GuardState::Idle => false,
            GuardState::Pending { flight, cancel } => {
                debug!("{}: cancelling flight {}", self.name, flight);
                // The receiver may already be gone if the flight just finished.
                let _ = cancel.send(());
                true
            }
        }
    }

    fn begin(&self) -> FlightPermit<'_> {
        let flight = self.next_flight.get();
        self.next_flight.set(flight.wrapping_add(1));
        let (cancel, cancelled) = oneshot::channel();
        *self.state.borrow_mut() = GuardState::Pending { flight, cancel };
        FlightPermit {
            guard: self,
            flight,
            cancelled,
        }
    }
}

/// Proof of an outstanding flight. Dropping it releases the guard.
pub struct FlightPermit<'a> {
    guard: &'a InFlightGuard,
    flight: u64,
    cancelled: oneshot::Receiver<()>,
}

impl FlightPermit<'_> {
    pub fn flight(&self) -> u64 {
        self.flight
    }

    /// Resolves once this flight has been abandoned through the guard.
    pub fn cancelled(&mut self) -> impl Future<Output = ()> + Unpin + '_ {
        (&mut self.cancelled).map(|_| ())
    }
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        let mut state = self.guard.state.borrow_mut();
        // A superseded permit must not release the flight that replaced it.
        if matches!(*state, GuardState::Pending { flight, .. } if flight == self.flight) {
            *state = GuardState::Idle;
        }
    }
}
