//! User endpoints.

use secrecy::SecretString;

use tutorhub_core::UserSummary;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetch the authenticated user via `GET /users/me`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn current_user(&self, token: &SecretString) -> Result<UserSummary, ApiError> {
        let response = self
            .authed(self.http().get(self.url("users/me")), token)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch all users via `GET /users` (admin only).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn list_users(&self, token: &SecretString) -> Result<Vec<UserSummary>, ApiError> {
        let response = self
            .authed(self.http().get(self.url("users")), token)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch all tutors via `GET /users/tutors/list` (admin only).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn list_tutors(&self, token: &SecretString) -> Result<Vec<UserSummary>, ApiError> {
        let response = self
            .authed(self.http().get(self.url("users/tutors/list")), token)
            .send()
            .await?;
        Self::parse(response).await
    }
}
