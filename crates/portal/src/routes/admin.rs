//! Admin route handlers.
//!
//! The admin pages cover the all-assignments overview, the assign-tutor
//! operation, the user listing, and subject management. The user and tutor
//! listings are served through the store's TTL cache; `?refresh=1` forces a
//! network fetch.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use tutorhub_core::{
    Assignment, AssignmentId, AssignmentStatus, Capability, Comment, NavItem, Subject, SubjectId,
    UserId, UserSummary,
};

use crate::api::SubjectPayload;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAuth, guard};
use crate::state::AppState;

// =============================================================================
// Form and Query Types
// =============================================================================

/// Assign-tutor form data.
#[derive(Debug, Deserialize)]
pub struct AssignForm {
    pub tutor_id: i32,
}

/// Subject create/update form data.
#[derive(Debug, Deserialize)]
pub struct SubjectForm {
    pub name: String,
    pub description: Option<String>,
}

/// Query parameters for cache-refresh requests.
#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: Option<String>,
}

impl RefreshQuery {
    fn force(&self) -> bool {
        self.refresh.as_deref() == Some("1")
    }
}

// =============================================================================
// Templates
// =============================================================================

/// All-assignments overview template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminOverviewTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub assignments: Vec<Assignment>,
}

/// Admin assignment detail template with the assign-tutor form.
#[derive(Template, WebTemplate)]
#[template(path = "admin/assignment.html")]
pub struct AdminAssignmentTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub assignment: Assignment,
    pub comments: Vec<Comment>,
    pub tutors: Vec<UserSummary>,
    /// The assign form only renders while the assignment awaits a tutor.
    pub can_assign: bool,
    pub file_url: Option<String>,
    pub solution_url: Option<String>,
    pub comment_action: String,
}

/// User listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UserListTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub users: Vec<UserSummary>,
}

/// Subject management template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/subjects.html")]
pub struct SubjectListTemplate {
    pub user_name: String,
    pub nav: &'static [NavItem],
    pub subjects: Vec<Subject>,
    pub error: Option<String>,
}

// =============================================================================
// Assignment Routes
// =============================================================================

/// Display all assignments in the system.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ViewAllAssignments)?;

    let assignments = ctx
        .assignments()
        .fetch_all(state.api(), ctx.token())
        .await?;

    Ok(AdminOverviewTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        assignments,
    }
    .into_response())
}

/// Display one assignment with the assign-tutor form.
pub async fn show_assignment(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<AssignmentId>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ViewAllAssignments)?;

    let assignment = ctx
        .assignments()
        .fetch_by_id(state.api(), ctx.token(), id)
        .await?;
    let comments = ctx
        .comments()
        .fetch_for_assignment(state.api(), ctx.token(), id)
        .await?;
    let tutors = ctx
        .users()
        .fetch_tutors(state.api(), ctx.token(), false)
        .await?;

    let file_url = assignment.file_path.as_deref().map(|p| state.api().file_url(p));
    let solution_url = assignment
        .solution_file_path
        .as_deref()
        .map(|p| state.api().file_url(p));
    let can_assign = assignment.status == AssignmentStatus::Submitted;

    Ok(AdminAssignmentTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        assignment,
        comments,
        tutors,
        can_assign,
        file_url,
        solution_url,
        comment_action: format!("/assignments/{id}/comments"),
    }
    .into_response())
}

/// Bind a tutor to a submitted assignment.
pub async fn assign_tutor(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<AssignmentId>,
    Form(form): Form<AssignForm>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::AssignTutors)?;

    let updated = ctx
        .assignments()
        .assign_tutor(state.api(), ctx.token(), id, UserId::new(form.tutor_id))
        .await?;

    tracing::info!(
        assignment_id = %id,
        tutor_id = form.tutor_id,
        status = %updated.status,
        "tutor assigned"
    );
    Ok(Redirect::to(&format!("/admin/assignments/{id}")).into_response())
}

// =============================================================================
// User Routes
// =============================================================================

/// Display the full user listing.
pub async fn users(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Query(query): Query<RefreshQuery>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ManageUsers)?;

    let users = ctx
        .users()
        .fetch_all(state.api(), ctx.token(), query.force())
        .await?;

    Ok(UserListTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        users,
    }
    .into_response())
}

// =============================================================================
// Subject Routes
// =============================================================================

/// Display the subject listing with the create form.
pub async fn subjects(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ManageSubjects)?;

    let subjects = ctx.subjects().fetch_all(state.api(), ctx.token()).await?;

    Ok(SubjectListTemplate {
        user_name: ctx.user().name.clone(),
        nav: ctx.user().role.nav_items(),
        subjects,
        error: None,
    }
    .into_response())
}

/// Create a subject.
pub async fn create_subject(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Form(form): Form<SubjectForm>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ManageSubjects)?;

    let payload = subject_payload(form)?;
    ctx.subjects()
        .create(state.api(), ctx.token(), payload)
        .await?;

    Ok(Redirect::to("/admin/subjects").into_response())
}

/// Update a subject.
pub async fn update_subject(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<SubjectId>,
    Form(form): Form<SubjectForm>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ManageSubjects)?;

    let payload = subject_payload(form)?;
    ctx.subjects()
        .update(state.api(), ctx.token(), id, payload)
        .await?;

    Ok(Redirect::to("/admin/subjects").into_response())
}

/// Delete a subject.
pub async fn delete_subject(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
    Path(id): Path<SubjectId>,
) -> Result<Response> {
    guard(ctx.user().role, Capability::ManageSubjects)?;

    ctx.subjects().delete(state.api(), ctx.token(), id).await?;

    tracing::info!(subject_id = %id, "subject deleted");
    Ok(Redirect::to("/admin/subjects").into_response())
}

fn subject_payload(form: SubjectForm) -> Result<SubjectPayload> {
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest("subject name is required".to_owned()));
    }
    Ok(SubjectPayload {
        name: form.name,
        description: form.description.filter(|d| !d.trim().is_empty()),
    })
}
