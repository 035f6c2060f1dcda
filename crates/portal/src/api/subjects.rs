//! Subject endpoints.

use secrecy::SecretString;

use tutorhub_core::{Subject, SubjectId};

use super::{ApiClient, ApiError, SubjectPayload};

impl ApiClient {
    /// Fetch all subjects via `GET /subjects`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn list_subjects(&self, token: &SecretString) -> Result<Vec<Subject>, ApiError> {
        let response = self
            .authed(self.http().get(self.url("subjects")), token)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Create a subject via `POST /subjects` (admin only).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] with the server's detail message (e.g.
    /// duplicate name) on failure.
    pub async fn create_subject(
        &self,
        token: &SecretString,
        payload: &SubjectPayload,
    ) -> Result<Subject, ApiError> {
        let response = self
            .authed(self.http().post(self.url("subjects")), token)
            .json(payload)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Update a subject via `PUT /subjects/{id}` (admin only).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id, or any other
    /// [`ApiError`] on transport/server failure.
    pub async fn update_subject(
        &self,
        token: &SecretString,
        id: SubjectId,
        payload: &SubjectPayload,
    ) -> Result<Subject, ApiError> {
        let response = self
            .authed(self.http().put(self.url(&format!("subjects/{id}"))), token)
            .json(payload)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Delete a subject via `DELETE /subjects/{id}` (admin only).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn delete_subject(&self, token: &SecretString, id: SubjectId) -> Result<(), ApiError> {
        let response = self
            .authed(self.http().delete(self.url(&format!("subjects/{id}"))), token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
