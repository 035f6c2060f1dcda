//! Assignment store.
//!
//! Mirrors the assignment collection visible to the session, plus the
//! assignment currently open on a detail page. Mutating operations splice
//! the server's returned representation back into the collection; nothing is
//! recomputed locally.

use secrecy::SecretString;
use tokio::sync::RwLock;

use tutorhub_core::{Assignment, AssignmentId, AssignmentStatus, UserId};

use crate::api::{ApiClient, ApiError, NewAssignment, UploadedFile};

use super::{Phase, StoreError, Ticket, TicketCounter};

/// Slice state for assignments.
#[derive(Debug, Clone, Default)]
pub struct AssignmentState {
    /// The mirrored collection, in server order.
    pub assignments: Vec<Assignment>,
    /// The assignment open on a detail page, if any.
    pub current: Option<Assignment>,
    /// Request-lifecycle flags.
    pub phase: Phase,
}

impl AssignmentState {
    /// Replace the matching record in the collection and make it current.
    fn splice(&mut self, updated: &Assignment) {
        self.current = Some(updated.clone());
        if let Some(existing) = self.assignments.iter_mut().find(|a| a.id == updated.id) {
            *existing = updated.clone();
        }
    }
}

/// Store owning the local copy of the assignment collection.
#[derive(Debug, Default)]
pub struct AssignmentStore {
    state: RwLock<AssignmentState>,
    tickets: TicketCounter,
}

impl AssignmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cloned snapshot of the slice state.
    pub async fn snapshot(&self) -> AssignmentState {
        self.state.read().await.clone()
    }

    /// Fetch the assignments visible to this session.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn fetch_all(
        &self,
        api: &ApiClient,
        token: &SecretString,
    ) -> Result<Vec<Assignment>, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.list_assignments(token).await;
        self.resolve(ticket, outcome, |state, list| {
            state.assignments = list.clone();
        })
        .await
    }

    /// Fetch one assignment into `current`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn fetch_by_id(
        &self,
        api: &ApiClient,
        token: &SecretString,
        id: AssignmentId,
    ) -> Result<Assignment, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.get_assignment(token, id).await;
        self.resolve(ticket, outcome, |state, assignment| {
            state.current = Some(assignment.clone());
        })
        .await
    }

    /// Submit a new assignment; on success it is appended to the collection
    /// under its server-assigned id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn create(
        &self,
        api: &ApiClient,
        token: &SecretString,
        new: NewAssignment,
    ) -> Result<Assignment, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.create_assignment(token, new).await;
        self.resolve(ticket, outcome, |state, created| {
            state.assignments.push(created.clone());
        })
        .await
    }

    /// Bind a tutor (admin operation); the record moves to `assigned`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn assign_tutor(
        &self,
        api: &ApiClient,
        token: &SecretString,
        id: AssignmentId,
        tutor_id: UserId,
    ) -> Result<Assignment, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.assign_tutor(token, id, tutor_id).await;
        self.resolve(ticket, outcome, AssignmentState::splice).await
    }

    /// Advance the lifecycle status (tutor operation), optionally attaching
    /// feedback text.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn update_status(
        &self,
        api: &ApiClient,
        token: &SecretString,
        id: AssignmentId,
        status: AssignmentStatus,
        description: Option<String>,
    ) -> Result<Assignment, StoreError> {
        let ticket = self.begin().await;
        let outcome = api
            .update_assignment_status(token, id, status, description)
            .await;
        self.resolve(ticket, outcome, AssignmentState::splice).await
    }

    /// Attach a solution file (tutor operation).
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn upload_solution(
        &self,
        api: &ApiClient,
        token: &SecretString,
        id: AssignmentId,
        file: UploadedFile,
    ) -> Result<Assignment, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.upload_solution(token, id, file).await;
        self.resolve(ticket, outcome, AssignmentState::splice).await
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
        apply: impl FnOnce(&mut AssignmentState, &T),
    ) -> Result<T, StoreError> {
        let mut state = self.state.write().await;
        if !self.tickets.is_current(ticket) {
            tracing::debug!("discarding superseded assignment response");
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
