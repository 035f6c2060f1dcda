//! Student assignment route handlers.
//!
//! Listing and detail pages mirror what the upstream API returns for the
//! session; submission posts a multipart form with an optional attachment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use tutorhub_core::{Assignment, AssignmentId, Capability, Comment, NavItem, Subject, SubjectId};

use crate::api::{NewAssignment, NewComment, UploadedFile};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAuth, guard};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Comment form data.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Assignment listing template.
#[derive(Template, WebTemplate)]
#[template(path = "assignments/list.html")]
pub struct AssignmentListTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub assignments: Vec<Assignment>,
}

/// Submission form template.
#[derive(Template, WebTemplate)]
#[template(path = "assignments/submit.html")]
pub struct SubmitTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub subjects: Vec<Subject>,
    pub error: Option<String>,
}

/// Assignment detail template.
#[derive(Template, WebTemplate)]
#[template(path = "assignments/view.html")]
pub struct AssignmentDetailTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub assignment: Assignment,
    pub comments: Vec<Comment>,
    /// Absolute download URL of the submission file, if any.
    pub file_url: Option<String>,
    /// Absolute download URL of the solution file, if any.
    pub solution_url: Option<String>,
    /// Where the comment form posts back to.
    pub comment_action: String,
}

// =============================================================================
// Multipart Parsing
// =============================================================================

/// Read the submission form out of a multipart body.
///
/// The attachment is optional; when present it is size-checked against the
/// configured ceiling before it ever reaches the API client.
async fn read_submission(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<NewAssignment> {
    let mut title = None;
    let mut description = None;
    let mut submission_text = None;
    let mut subject_id = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "description" => {
                description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "submission_text" => {
                submission_text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "subject_id" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let id: i32 = raw
                    .parse()
                    .map_err(|_| AppError::BadRequest(format!("invalid subject id: {raw}")))?;
                subject_id = Some(SubjectId::new(id));
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                // An empty file input still produces a field; skip it.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                if bytes.len() > max_upload_bytes {
                    return Err(AppError::BadRequest(format!(
                        "file exceeds the {max_upload_bytes} byte upload limit"
                    )));
                }
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("title is required".to_owned()))?;
    let subject_id =
        subject_id.ok_or_else(|| AppError::BadRequest("subject is required".to_owned()))?;

    Ok(NewAssignment {
        title,
        description: description.filter(|d| !d.trim().is_empty()),
        submission_text: submission_text.filter(|t| !t.trim().is_empty()),
        subject_id,
        file,
    })
}

// =============================================================================
// Routes
// =============================================================================

/// Display the session's own assignments.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> Result<Response> {
    guard(ctx.user().role, Capability::SubmitAssignments)?;

    let assignments = ctx
        .assignments()
        .fetch_all(state.api(), ctx.token())
        .await?;

    Ok(AssignmentListTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        assignments,
    }
    .into_response())
}

/// Display the submission form.
pub async fn submit_page(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> Result<Response> {
    guard(ctx.user().role, Capability::SubmitAssignments)?;

    let subjects = ctx.subjects().fetch_all(state.api(), ctx.token()).await?;

    Ok(SubmitTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        subjects,
        error: None,
    }
    .into_response())
}

/// Handle submission of a new assignment.
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    multipart: Multipart,
) -> Result<Response> {
    guard(ctx.user().role, Capability::SubmitAssignments)?;

    let new = read_submission(multipart, state.config().max_upload_bytes).await?;
    let created = ctx
        .assignments()
        .create(state.api(), ctx.token(), new)
        .await?;

    tracing::info!(assignment_id = %created.id, "assignment submitted");
    Ok(Redirect::to(&format!("/assignments/{}", created.id)).into_response())
}

/// Display one assignment with its comment thread.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<AssignmentId>,
) -> Result<Response> {
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

    Ok(AssignmentDetailTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        assignment,
        comments,
        file_url,
        solution_url,
        comment_action: format!("/assignments/{id}/comments"),
    }
    .into_response())
}

/// Append a comment to an assignment's thread.
pub async fn comment(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<AssignmentId>,
    Form(form): Form<CommentForm>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::Comment)?;

    if form.text.trim().is_empty() {
        return Err(AppError::BadRequest("comment text is required".to_owned()));
    }

    ctx.comments()
        .create(
            state.api(),
            ctx.token(),
            NewComment {
                text: form.text,
                assignment_id: id,
            },
        )
        .await?;

    Ok(Redirect::to(&format!("/assignments/{id}")).into_response())
}
