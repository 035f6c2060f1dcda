//! Authentication endpoints.

use secrecy::SecretString;

use tutorhub_core::UserSummary;

use super::{ApiClient, ApiError, RegisterRequest, TokenResponse};

impl ApiClient {
    /// Exchange credentials for a bearer token via `POST /token`.
    ///
    /// The endpoint is OAuth2 form-encoded: the email travels in the
    /// `username` field.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for bad credentials, or any other
    /// [`ApiError`] on transport/server failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let response = self
            .http()
            .post(self.url("token"))
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Register a new account via `POST /register`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] with the server's detail message (e.g. email
    /// already registered) on failure.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserSummary, ApiError> {
        let response = self
            .http()
            .post(self.url("register"))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Invalidate the server-side session via `POST /logout`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure; callers treat
    /// this as best-effort during teardown.
    pub async fn logout(&self, token: &SecretString) -> Result<(), ApiError> {
        let response = self
            .authed(self.http().post(self.url("logout")), token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
