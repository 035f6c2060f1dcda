//! Tutor review route handlers.
//!
//! Tutors see the assignments bound to them, advance the lifecycle status
//! with optional feedback, and attach solution files. Which transitions the
//! review page offers comes from the lifecycle table; the server still has
//! the final word.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use tutorhub_core::{
    Assignment, AssignmentId, AssignmentStatus, Capability, Comment, NavItem,
};

use crate::api::UploadedFile;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAuth, guard};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    pub description: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Tutor assignment listing template.
#[derive(Template, WebTemplate)]
#[template(path = "tutor/assignments.html")]
pub struct TutorListTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub assignments: Vec<Assignment>,
}

/// Review page template.
#[derive(Template, WebTemplate)]
#[template(path = "tutor/review.html")]
pub struct ReviewTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub assignment: Assignment,
    pub comments: Vec<Comment>,
    /// Transitions the status form offers from the current status.
    pub next_statuses: &'static [AssignmentStatus],
    pub file_url: Option<String>,
    pub solution_url: Option<String>,
    pub comment_action: String,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the assignments bound to this tutor.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ReviewAssignments)?;

    let assignments = ctx
        .assignments()
        .fetch_all(state.api(), ctx.token())
        .await?;

    Ok(TutorListTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        assignments,
    }
    .into_response())
}

/// Display the review page for one assignment.
pub async fn review(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<AssignmentId>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ReviewAssignments)?;

    let assignment = ctx
        .assignments()
        .fetch_by_id(state.api(), ctx.token(), id)
        .await?;
    let comments = ctx
        .comments()
        .fetch_for_assignment(state.api(), ctx.token(), id)
        .await?;

    let file_url = assignment.file_path.as_deref().map(|p| state.api().file_url(p));
    let solution_url = assignment
        .solution_file_path
        .as_deref()
        .map(|p| state.api().file_url(p));
    let next_statuses = assignment.status.successors();

    Ok(ReviewTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        assignment,
        comments,
        next_statuses,
        file_url,
        solution_url,
        comment_action: format!("/assignments/{id}/comments"),
    }
    .into_response())
}

/// Advance an assignment's lifecycle status.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<AssignmentId>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ReviewAssignments)?;

    let status: AssignmentStatus = form
        .status
        .parse()
        .map_err(|e: tutorhub_core::UnknownStatus| AppError::BadRequest(e.to_string()))?;

    let description = form.description.filter(|d| !d.trim().is_empty());
    let updated = ctx
        .assignments()
        .update_status(state.api(), ctx.token(), id, status, description)
        .await?;

    tracing::info!(assignment_id = %id, status = %updated.status, "status advanced");
    Ok(Redirect::to(&format!("/tutor/assignments/{id}")).into_response())
}

/// Attach a solution file to an assignment.
pub async fn upload_solution(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<AssignmentId>,
    mut multipart: Multipart,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ReviewAssignments)?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if bytes.len() > state.config().max_upload_bytes {
            return Err(AppError::BadRequest(format!(
                "file exceeds the {} byte upload limit",
                state.config().max_upload_bytes
            )));
        }
        file = Some(UploadedFile {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let file = file.ok_or_else(|| AppError::BadRequest("solution file is required".to_owned()))?;

    ctx.assignments()
        .upload_solution(state.api(), ctx.token(), id, file)
        .await?;

    tracing::info!(assignment_id = %id, "solution uploaded");
    Ok(Redirect::to(&format!("/tutor/assignments/{id}")).into_response())
}
