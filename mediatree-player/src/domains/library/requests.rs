use std::collections::HashMap;

use log::trace;
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Browse,
    Search,
}

/// Proof that a request was issued; handed back on completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    kind: RequestKind,
    generation: u64,
}

impl RequestTicket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct InFlight {
    target: String,
    generation: u64,
}

/// In-flight guard and supersession bookkeeping for listing requests.
///
/// One slot per kind. Issuing the target already in flight is refused;
/// issuing a different target takes over the slot, so the older request's
/// result is discarded when it lands. Only the last issued request of a
/// kind ever renders.
#[derive(Debug, Default)]
pub struct RequestTracker {
    in_flight: HashMap<RequestKind, InFlight>,
    next_generation: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the same target is already outstanding.
    pub fn begin(
        &mut self,
        kind: RequestKind,
        target: impl Into<String>,
    ) -> Option<RequestTicket> {
        let target = target.into();
        if let Some(current) = self.in_flight.get(&kind)
            && current.target == target
        {
            trace!("[Library] {:?} for {:?} already in flight", kind, target);
            return None;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        self.in_flight.insert(kind, InFlight { target, generation });
        Some(RequestTicket { kind, generation })
    }

    /// Settles a request. Returns `true` if its result should be rendered,
    /// `false` if a newer request of the same kind superseded it.
    pub fn complete(&mut self, ticket: &RequestTicket) -> bool {
        match self.in_flight.get(&ticket.kind) {
            Some(current) if current.generation == ticket.generation => {
                self.in_flight.remove(&ticket.kind);
                true
            }
            _ => {
                trace!(
                    "[Library] Discarding superseded {:?} #{}",
                    ticket.kind, ticket.generation
                );
                false
            }
        }
    }

    /// Frees the slot of a request that will never complete. A newer
    /// request holding the slot is left alone.
    pub fn abandon(&mut self, ticket: &RequestTicket) {
        if let Some(current) = self.in_flight.get(&ticket.kind)
            && current.generation == ticket.generation
        {
            trace!(
                "[Library] Abandoned {:?} #{}",
                ticket.kind, ticket.generation
            );
            self.in_flight.remove(&ticket.kind);
        }
    }

    pub fn is_in_flight(&self, kind: RequestKind) -> bool {
        self.in_flight.contains_key(&kind)
    }
}

/// An issued request that holds its tracker slot until it settles.
///
/// Dropping it unsettled (the caller's future was cancelled) releases the
/// slot, so the same target can be requested again.
#[derive(Debug)]
pub struct PendingRequest<'a> {
    tracker: &'a Mutex<RequestTracker>,
    ticket: Option<RequestTicket>,
}

impl<'a> PendingRequest<'a> {
    /// `None` when the same target is already outstanding.
    pub fn begin(
        tracker: &'a Mutex<RequestTracker>,
        kind: RequestKind,
        target: impl Into<String>,
    ) -> Option<Self> {
        let ticket = tracker.lock().begin(kind, target)?;
        Some(Self {
            tracker,
            ticket: Some(ticket),
        })
    }

    /// Settles the request; `true` if its result should be rendered.
    pub fn finish(mut self) -> bool {
        match self.ticket.take() {
            Some(ticket) => self.tracker.lock().complete(&ticket),
            None => false,
        }
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.tracker.lock().abandon(&ticket);
        }
    }
}
