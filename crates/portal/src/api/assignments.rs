//! Assignment endpoints.

use reqwest::multipart::{Form, Part};
use secrecy::SecretString;

use tutorhub_core::{Assignment, AssignmentId, AssignmentStatus, UserId};

use super::{ApiClient, ApiError, AssignTutorRequest, NewAssignment, StatusUpdateRequest, UploadedFile};

fn file_part(file: UploadedFile) -> Result<Part, ApiError> {
    Ok(Part::bytes(file.bytes)
        .file_name(file.filename)
        .mime_str(&file.content_type)?)
}

impl ApiClient {
    /// Fetch the assignments visible to the session via `GET /assignments`.
    ///
    /// The server scopes the listing by role (students see their own, tutors
    /// what is assigned to them, admins everything).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn list_assignments(&self, token: &SecretString) -> Result<Vec<Assignment>, ApiError> {
        let response = self
            .authed(self.http().get(self.url("assignments")), token)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch one assignment via `GET /assignments/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id, or any other
    /// [`ApiError`] on transport/server failure.
    pub async fn get_assignment(
        &self,
        token: &SecretString,
        id: AssignmentId,
    ) -> Result<Assignment, ApiError> {
        let response = self
            .authed(self.http().get(self.url(&format!("assignments/{id}"))), token)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Submit a new assignment via `POST /assignments` (multipart).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn create_assignment(
        &self,
        token: &SecretString,
        new: NewAssignment,
    ) -> Result<Assignment, ApiError> {
        let mut form = Form::new()
            .text("title", new.title)
            .text("subject_id", new.subject_id.to_string());
        if let Some(description) = new.description {
            form = form.text("description", description);
        }
        if let Some(submission_text) = new.submission_text {
            form = form.text("submission_text", submission_text);
        }
        if let Some(file) = new.file {
            form = form.part("file", file_part(file)?);
        }

        let response = self
            .authed(self.http().post(self.url("assignments")), token)
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Bind a tutor via `PUT /assignments/{id}/assign` (admin only).
    ///
    /// Always carries status `assigned` alongside the tutor reference.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn assign_tutor(
        &self,
        token: &SecretString,
        id: AssignmentId,
        tutor_id: UserId,
    ) -> Result<Assignment, ApiError> {
        let response = self
            .authed(
                self.http()
                    .put(self.url(&format!("assignments/{id}/assign"))),
                token,
            )
            .json(&AssignTutorRequest::new(tutor_id))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Advance the lifecycle via `PUT /assignments/{id}/status` (tutor only).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn update_assignment_status(
        &self,
        token: &SecretString,
        id: AssignmentId,
        status: AssignmentStatus,
        description: Option<String>,
    ) -> Result<Assignment, ApiError> {
        let response = self
            .authed(
                self.http()
                    .put(self.url(&format!("assignments/{id}/status"))),
                token,
            )
            .json(&StatusUpdateRequest {
                status,
                description,
            })
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Attach a solution file via `PUT /assignments/{id}/solution` (tutor only).
    ///
    /// The server decides whether the status moves as a side effect; the
    /// returned representation is applied verbatim.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport/server failure.
    pub async fn upload_solution(
        &self,
        token: &SecretString,
        id: AssignmentId,
        file: UploadedFile,
    ) -> Result<Assignment, ApiError> {
        let form = Form::new().part("file", file_part(file)?);
        let response = self
            .authed(
                self.http()
                    .put(self.url(&format!("assignments/{id}/solution"))),
                token,
            )
            .multipart(form)
            .send()
            .await?;
        Self::parse(response).await
    }
}
