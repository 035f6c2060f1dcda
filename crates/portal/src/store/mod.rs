//! Session-scoped resource stores.
//!
//! Each store mirrors one server-backed collection and mediates every
//! read/write against it through a uniform three-phase contract:
//!
//! 1. **pending** - `loading` is set, any previous error is cleared, and a
//!    monotonically increasing request ticket is issued;
//! 2. **fulfilled** - the server's returned representation is merged exactly
//!    into local state (replace by id, append on create, remove on delete);
//! 3. **rejected** - a human-readable message lands in `error` and the
//!    existing data is left untouched.
//!
//! Every invocation has exactly one terminal outcome. Responses whose ticket
//! is no longer the most recently issued for the store are discarded instead
//! of applied, so a slow stale response can never overwrite a fresher one;
//! such invocations resolve as [`StoreError::Superseded`].
//!
//! Pages read cloned snapshots; a store is the sole mutable owner of its
//! collection.

pub mod assignments;
pub mod comments;
pub mod subjects;
pub mod users;

pub use assignments::{AssignmentState, AssignmentStore};
pub use comments::{CommentState, CommentStore};
pub use subjects::{SubjectState, SubjectStore};
pub use users::{UserState, UserStore};

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The API call failed; the message is already recorded in the slice's
    /// `error` field.
    #[error("{0}")]
    Api(String),

    /// A newer request was issued before this one resolved; the response was
    /// discarded and slice state is unchanged by this invocation.
    #[error("superseded by a newer request")]
    Superseded,
}

/// Request-lifecycle flags shared by every slice.
#[derive(Debug, Clone, Default)]
pub struct Phase {
    /// Whether an operation is currently in flight.
    pub loading: bool,
    /// Human-readable message of the most recent rejected operation.
    pub error: Option<String>,
}

impl Phase {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn fulfill(&mut self) {
        self.loading = false;
        self.error = None;
    }

    pub(crate) fn reject(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

/// A monotonic ticket identifying one dispatched operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

/// Issues tickets and remembers the most recent one per store.
#[derive(Debug, Default)]
pub(crate) struct TicketCounter {
    issued: AtomicU64,
}

impl TicketCounter {
    /// Issue the next ticket; it becomes the most recent outstanding request.
    pub(crate) fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recently issued.
    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}
