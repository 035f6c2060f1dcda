//! Comment endpoints.

use secrecy::SecretString;

use tutorhub_core::{AssignmentId, Comment};

use super::{ApiClient, ApiError, NewComment};

impl ApiClient {
    /// Fetch the comment thread of an assignment via
    /// `GET /comments/assignment/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn comments_for_assignment(
        &self,
        token: &SecretString,
        assignment_id: AssignmentId,
    ) -> Result<Vec<Comment>, ApiError> {
        let response = self
            .authed(
                self.http()
                    .get(self.url(&format!("comments/assignment/{assignment_id}"))),
                token,
            )
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Append a comment via `POST /comments`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn create_comment(
        &self,
        token: &SecretString,
        new: &NewComment,
    ) -> Result<Comment, ApiError> {
        let response = self
            .authed(self.http().post(self.url("comments")), token)
            .json(new)
            .send()
            .await?;
        Self::parse(response).await
    }
}
