//! Comment store.
//!
//! Holds the comment thread of the assignment currently open on a detail or
//! review page. Append-only: creation pushes the server's returned
//! representation, nothing is ever edited or removed locally.

use secrecy::SecretString;
use tokio::sync::RwLock;

use tutorhub_core::{AssignmentId, Comment};

use crate::api::{ApiClient, ApiError, NewComment};

use super::{Phase, StoreError, Ticket, TicketCounter};

/// Slice state for the open comment thread.
#[derive(Debug, Clone, Default)]
pub struct CommentState {
    /// The thread, in server order (oldest first).
    pub comments: Vec<Comment>,
    /// Which assignment the thread belongs to.
    pub assignment_id: Option<AssignmentId>,
    /// Request-lifecycle flags.
    pub phase: Phase,
}

/// Store owning the local copy of one assignment's comment thread.
#[derive(Debug, Default)]
pub struct CommentStore {
    state: RwLock<CommentState>,
    tickets: TicketCounter,
}

impl CommentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cloned snapshot of the slice state.
    pub async fn snapshot(&self) -> CommentState {
        self.state.read().await.clone()
    }

    /// Fetch the thread of an assignment, replacing any previous thread.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn fetch_for_assignment(
        &self,
        api: &ApiClient,
        token: &SecretString,
        assignment_id: AssignmentId,
    ) -> Result<Vec<Comment>, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.comments_for_assignment(token, assignment_id).await;
        self.resolve(ticket, outcome, |state, list| {
            state.assignment_id = Some(assignment_id);
            state.comments = list.clone();
        })
        .await
    }

    /// Append a comment; on success the server's representation is pushed.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn create(
        &self,
        api: &ApiClient,
        token: &SecretString,
        new: NewComment,
    ) -> Result<Comment, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.create_comment(token, &new).await;
        self.resolve(ticket, outcome, |state, created| {
            if state.assignment_id == Some(created.assignment_id) {
                state.comments.push(created.clone());
            }
        })
        .await
    }

    async fn begin(&self) -> Ticket {
        let ticket = self.tickets.begin();
        self.state.write().await.phase.begin();
        ticket
    }

    async fn resolve<T: Clone>(
        &self,
        ticket: Ticket,
        outcome: Result<T, ApiError>,
        apply: impl FnOnce(&mut CommentState, &T),
    ) -> Result<T, StoreError> {
        let mut state = self.state.write().await;
        if !self.tickets.is_current(ticket) {
            tracing::debug!("discarding superseded comment response");
            return Err(StoreError::Superseded);
        }
        match outcome {
            Ok(value) => {
                state.phase.fulfill();
                apply(&mut state, &value);
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                state.phase.reject(message.clone());
                Err(StoreError::Api(message))
            }
        }
    }
}
