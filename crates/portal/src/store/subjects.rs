//! Subject store.

use secrecy::SecretString;
use tokio::sync::RwLock;

use tutorhub_core::{Subject, SubjectId};

use crate::api::{ApiClient, ApiError, SubjectPayload};

use super::{Phase, StoreError, Ticket, TicketCounter};

/// Slice state for subjects.
#[derive(Debug, Clone, Default)]
pub struct SubjectState {
    /// The mirrored collection, in server order.
    pub subjects: Vec<Subject>,
    /// Request-lifecycle flags.
    pub phase: Phase,
}

/// Store owning the local copy of the subject collection.
#[derive(Debug, Default)]
pub struct SubjectStore {
    state: RwLock<SubjectState>,
    tickets: TicketCounter,
}

impl SubjectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cloned snapshot of the slice state.
    pub async fn snapshot(&self) -> SubjectState {
        self.state.read().await.clone()
    }

    /// Fetch all subjects.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn fetch_all(
        &self,
        api: &ApiClient,
        token: &SecretString,
    ) -> Result<Vec<Subject>, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.list_subjects(token).await;
        self.resolve(ticket, outcome, |state, list| {
            state.subjects = list.clone();
        })
        .await
    }

    /// Create a subject (admin operation); appended under its server id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn create(
        &self,
        api: &ApiClient,
        token: &SecretString,
        payload: SubjectPayload,
    ) -> Result<Subject, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.create_subject(token, &payload).await;
        self.resolve(ticket, outcome, |state, created| {
            state.subjects.push(created.clone());
        })
        .await
    }

    /// Update a subject (admin operation); exactly the matching record is
    /// replaced.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn update(
        &self,
        api: &ApiClient,
        token: &SecretString,
        id: SubjectId,
        payload: SubjectPayload,
    ) -> Result<Subject, StoreError> {
        let ticket = self.begin().await;
        let outcome = api.update_subject(token, id, &payload).await;
        self.resolve(ticket, outcome, |state, updated| {
            if let Some(existing) = state.subjects.iter_mut().find(|s| s.id == updated.id) {
                *existing = updated.clone();
            }
        })
        .await
    }

    /// Delete a subject (admin operation); the record is removed locally.
    ///
    /// # Errors
    ///
    /// [`StoreError::Api`] on failure, [`StoreError::Superseded`] if a newer
    /// request was issued before this one resolved.
    pub async fn delete(
        &self,
        api: &ApiClient,
        token: &SecretString,
        id: SubjectId,
    ) -> Result<(), StoreError> {
        let ticket = self.begin().await;
        let outcome = api.delete_subject(token, id).await.map(|()| id);
        self.resolve(ticket, outcome, |state, deleted| {
            state.subjects.retain(|s| s.id != *deleted);
        })
        .await
        .map(|_| ())
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
        apply: impl FnOnce(&mut SubjectState, &T),
    ) -> Result<T, StoreError> {
        let mut state = self.state.write().await;
        if !self.tickets.is_current(ticket) {
            tracing::debug!("discarding superseded subject response");
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
