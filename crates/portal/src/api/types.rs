//! Wire types for requests to and responses from the upstream API.

use serde::{Deserialize, Serialize};

use tutorhub_core::{AssignmentStatus, Role, SubjectId, UserId};

/// Response body of `POST /token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_role: Role,
    pub user_id: UserId,
}

/// Request body of `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// A file selected for upload, read fully into memory before dispatch.
///
/// The portal enforces the upload size ceiling before constructing one of
/// these, so the API client never sees an oversized payload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Parameters of `POST /assignments` (multipart).
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub description: Option<String>,
    pub submission_text: Option<String>,
    pub subject_id: SubjectId,
    pub file: Option<UploadedFile>,
}

/// Request body of `PUT /assignments/{id}/assign`.
#[derive(Debug, Clone, Serialize)]
pub struct AssignTutorRequest {
    pub tutor_id: UserId,
    pub status: AssignmentStatus,
}

impl AssignTutorRequest {
    /// Assigning a tutor always moves the assignment to `assigned`.
    #[must_use]
    pub const fn new(tutor_id: UserId) -> Self {
        Self {
            tutor_id,
            status: AssignmentStatus::Assigned,
        }
    }
}

/// Request body of `PUT /assignments/{id}/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateRequest {
    pub status: AssignmentStatus,
    /// Optional feedback text attached alongside the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body of `POST /subjects` and `PUT /subjects/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body of `POST /comments`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub text: String,
    pub assignment_id: tutorhub_core::AssignmentId,
}
