//! Integration test support for TutorHub.
//!
//! Provides [`StubApi`], an in-process stand-in for the upstream assignment
//! API. Tests seed it with users, subjects, and assignments, point the
//! portal (or a bare store) at its URL, and assert against both the HTTP
//! traffic it observed and the state it holds.
//!
//! The stub implements the same routes, auth scheme, and error bodies as
//! the real server: bearer tokens of the form `tok-<user id>`, role-scoped
//! assignment listings, and `{"detail": …}` failure payloads. Per-operation
//! hit counters and artificial delays let tests pin down caching and
//! request-ordering behavior.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use tutorhub_core::{
    Assignment, AssignmentId, AssignmentStatus, Comment, CommentId, Email, Role, Subject,
    SubjectId, UserId, UserSummary,
};

/// The password every seeded user accepts.
pub const TEST_PASSWORD: &str = "password";

/// Fixed timestamp used for all seeded records.
#[must_use]
pub fn seed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

#[derive(Default)]
struct Data {
    users: Vec<UserSummary>,
    subjects: Vec<Subject>,
    assignments: Vec<Assignment>,
    comments: Vec<Comment>,
    next_user: i32,
    next_subject: i32,
    next_assignment: i32,
    next_comment: i32,
}

struct StubState {
    data: Mutex<Data>,
    hits: Mutex<HashMap<&'static str, usize>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
}

/// In-process stub of the upstream assignment API.
#[derive(Clone)]
pub struct StubApi {
    state: Arc<StubState>,
}

impl Default for StubApi {
    fn default() -> Self {
        Self::new()
    }
}

impl StubApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(StubState {
                data: Mutex::new(Data::default()),
                hits: Mutex::new(HashMap::new()),
                delays: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Seed a user; returns its id. The user logs in with [`TEST_PASSWORD`].
    pub fn seed_user(&self, name: &str, email: &str, role: Role) -> UserId {
        let mut data = self.state.data.lock().expect("lock");
        data.next_user += 1;
        let id = UserId::new(data.next_user);
        data.users.push(UserSummary {
            id,
            name: name.to_owned(),
            email: Email::parse(email).expect("valid seed email"),
            role,
            created_at: seed_time(),
        });
        id
    }

    /// Seed a subject; returns its id.
    pub fn seed_subject(&self, name: &str) -> SubjectId {
        let mut data = self.state.data.lock().expect("lock");
        data.next_subject += 1;
        let id = SubjectId::new(data.next_subject);
        data.subjects.push(Subject {
            id,
            name: name.to_owned(),
            description: None,
        });
        id
    }

    /// Seed a submitted assignment; returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the student or subject has not been seeded.
    pub fn seed_assignment(&self, title: &str, student: UserId, subject: SubjectId) -> AssignmentId {
        let mut data = self.state.data.lock().expect("lock");
        let student_record = data
            .users
            .iter()
            .find(|u| u.id == student)
            .cloned()
            .expect("seeded student");
        let subject_record = data
            .subjects
            .iter()
            .find(|s| s.id == subject)
            .cloned()
            .expect("seeded subject");

        data.next_assignment += 1;
        let id = AssignmentId::new(data.next_assignment);
        data.assignments.push(Assignment {
            id,
            title: title.to_owned(),
            description: None,
            submission_text: None,
            file_path: None,
            solution_file_path: None,
            status: AssignmentStatus::Submitted,
            student_id: student,
            tutor_id: None,
            subject_id: subject,
            created_at: seed_time(),
            updated_at: seed_time(),
            returned_at: None,
            student: student_record,
            tutor: None,
            subject: subject_record,
        });
        id
    }

    /// The bearer token the stub accepts for a seeded user.
    #[must_use]
    pub fn token_for(user: UserId) -> String {
        format!("tok-{user}")
    }

    /// How many times the named operation has been served.
    #[must_use]
    pub fn hits(&self, op: &str) -> usize {
        self.state.hits.lock().expect("lock").get(op).copied().unwrap_or(0)
    }

    /// Delay every future request to the named operation.
    pub fn set_delay(&self, op: &'static str, delay: Duration) {
        self.state.delays.lock().expect("lock").insert(op, delay);
    }

    /// Clear an operation's delay.
    pub fn clear_delay(&self, op: &str) {
        self.state.delays.lock().expect("lock").remove(op);
    }

    /// Current server-side copy of an assignment.
    #[must_use]
    pub fn assignment(&self, id: AssignmentId) -> Option<Assignment> {
        self.state
            .data
            .lock()
            .expect("lock")
            .assignments
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Current server-side subject listing.
    #[must_use]
    pub fn subjects(&self) -> Vec<Subject> {
        self.state.data.lock().expect("lock").subjects.clone()
    }

    /// Current server-side user listing.
    #[must_use]
    pub fn users(&self) -> Vec<UserSummary> {
        self.state.data.lock().expect("lock").users.clone()
    }

    /// Bind to an ephemeral local port and serve until dropped.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(&self) -> Url {
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener address");
        let app = router(Arc::clone(&self.state));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub");
        });
        Url::parse(&format!("http://{addr}")).expect("stub url")
    }
}

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/token", post(token))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/users/me", get(users_me))
        .route("/users", get(users_list))
        .route("/users/tutors/list", get(tutors_list))
        .route("/assignments", get(assignments_list).post(assignments_create))
        .route("/assignments/{id}", get(assignments_get))
        .route("/assignments/{id}/assign", put(assignments_assign))
        .route("/assignments/{id}/status", put(assignments_status))
        .route("/assignments/{id}/solution", put(assignments_solution))
        .route("/subjects", get(subjects_list).post(subjects_create))
        .route(
            "/subjects/{id}",
            put(subjects_update).delete(subjects_delete),
        )
        .route("/comments/assignment/{id}", get(comments_list))
        .route("/comments", post(comments_create))
        .with_state(state)
}

fn hit(state: &StubState, op: &'static str) {
    *state.hits.lock().expect("lock").entry(op).or_insert(0) += 1;
}

async fn pause(state: &StubState, op: &str) {
    let delay = state.delays.lock().expect("lock").get(op).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

fn bearer_user(state: &StubState, headers: &HeaderMap) -> Result<UserSummary, Response> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let id: Option<i32> = header
        .strip_prefix("Bearer tok-")
        .and_then(|raw| raw.parse().ok());
    let Some(id) = id else {
        return Err(detail(StatusCode::UNAUTHORIZED, "Not authenticated"));
    };
    state
        .data
        .lock()
        .expect("lock")
        .users
        .iter()
        .find(|u| u.id == UserId::new(id))
        .cloned()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Deserialize)]
struct TokenForm {
    username: String,
    password: String,
}

async fn token(State(state): State<Arc<StubState>>, Form(form): Form<TokenForm>) -> Response {
    hit(&state, "token");
    if form.password != TEST_PASSWORD {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }
    let data = state.data.lock().expect("lock");
    data.users
        .iter()
        .find(|u| u.email.as_str() == form.username)
        .map_or_else(
            || detail(StatusCode::UNAUTHORIZED, "Incorrect email or password"),
            |user| {
                Json(json!({
                    "access_token": StubApi::token_for(user.id),
                    "token_type": "bearer",
                    "user_role": user.role,
                    "user_id": user.id,
                }))
                .into_response()
            },
        )
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    #[allow(dead_code)]
    password: String,
    role: Role,
}

async fn register(
    State(state): State<Arc<StubState>>,
    Json(body): Json<RegisterBody>,
) -> Response {
    hit(&state, "register");
    let Ok(email) = Email::parse(&body.email) else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "Invalid email address");
    };

    let mut data = state.data.lock().expect("lock");
    if data.users.iter().any(|u| u.email == email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    data.next_user += 1;
    let user = UserSummary {
        id: UserId::new(data.next_user),
        name: body.name,
        email,
        role: body.role,
        created_at: Utc::now(),
    };
    data.users.push(user.clone());
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn logout(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    hit(&state, "logout");
    match bearer_user(&state, &headers) {
        Ok(_) => Json(json!({ "message": "Logged out" })).into_response(),
        Err(response) => response,
    }
}

// =============================================================================
// Users
// =============================================================================

async fn users_me(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    hit(&state, "users_me");
    match bearer_user(&state, &headers) {
        Ok(user) => Json(user).into_response(),
        Err(response) => response,
    }
}

async fn users_list(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    hit(&state, "list_users");
    pause(&state, "list_users").await;
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if user.role != Role::Admin {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    let data = state.data.lock().expect("lock");
    Json(data.users.clone()).into_response()
}

async fn tutors_list(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    hit(&state, "list_tutors");
    pause(&state, "list_tutors").await;
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if user.role != Role::Admin {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    let data = state.data.lock().expect("lock");
    let tutors: Vec<_> = data
        .users
        .iter()
        .filter(|u| u.role == Role::Tutor)
        .cloned()
        .collect();
    Json(tutors).into_response()
}

// =============================================================================
// Assignments
// =============================================================================

async fn assignments_list(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    hit(&state, "list_assignments");
    pause(&state, "list_assignments").await;
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    let data = state.data.lock().expect("lock");
    let visible: Vec<_> = data
        .assignments
        .iter()
        .filter(|a| match user.role {
            Role::Admin => true,
            Role::Student => a.student_id == user.id,
            Role::Tutor => a.tutor_id == Some(user.id),
        })
        .cloned()
        .collect();
    Json(visible).into_response()
}

async fn assignments_get(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    hit(&state, "get_assignment");
    pause(&state, "get_assignment").await;
    if let Err(response) = bearer_user(&state, &headers) {
        return response;
    }
    let data = state.data.lock().expect("lock");
    data.assignments
        .iter()
        .find(|a| a.id == AssignmentId::new(id))
        .map_or_else(
            || detail(StatusCode::NOT_FOUND, "Assignment not found"),
            |a| Json(a.clone()).into_response(),
        )
}

async fn assignments_create(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    hit(&state, "create_assignment");
    pause(&state, "create_assignment").await;
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let mut title = None;
    let mut description = None;
    let mut submission_text = None;
    let mut subject_id = None;
    let mut file_name = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => title = field.text().await.ok(),
            "description" => description = field.text().await.ok(),
            "submission_text" => submission_text = field.text().await.ok(),
            "subject_id" => {
                subject_id = field
                    .text()
                    .await
                    .ok()
                    .and_then(|raw| raw.parse::<i32>().ok())
                    .map(SubjectId::new);
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_owned();
                if field.bytes().await.is_ok() && !filename.is_empty() {
                    file_name = Some(filename);
                }
            }
            _ => {}
        }
    }

    let Some(title) = title else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "title is required");
    };
    let Some(subject_id) = subject_id else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "subject_id is required");
    };

    let mut data = state.data.lock().expect("lock");
    let Some(subject) = data.subjects.iter().find(|s| s.id == subject_id).cloned() else {
        return detail(StatusCode::NOT_FOUND, "Subject not found");
    };

    data.next_assignment += 1;
    let id = AssignmentId::new(data.next_assignment);
    let now = Utc::now();
    let assignment = Assignment {
        id,
        title,
        description,
        submission_text,
        file_path: file_name.map(|f| format!("uploads/{}/{f}", user.id)),
        solution_file_path: None,
        status: AssignmentStatus::Submitted,
        student_id: user.id,
        tutor_id: None,
        subject_id,
        created_at: now,
        updated_at: now,
        returned_at: None,
        student: user,
        tutor: None,
        subject,
    };
    data.assignments.push(assignment.clone());
    (StatusCode::CREATED, Json(assignment)).into_response()
}

#[derive(Deserialize)]
struct AssignBody {
    tutor_id: i32,
    #[allow(dead_code)]
    status: AssignmentStatus,
}

async fn assignments_assign(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<AssignBody>,
) -> Response {
    hit(&state, "assign_tutor");
    pause(&state, "assign_tutor").await;
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if user.role != Role::Admin {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }

    let mut data = state.data.lock().expect("lock");
    let Some(tutor) = data
        .users
        .iter()
        .find(|u| u.id == UserId::new(body.tutor_id) && u.role == Role::Tutor)
        .cloned()
    else {
        return detail(StatusCode::BAD_REQUEST, "Tutor not found");
    };
    let Some(assignment) = data
        .assignments
        .iter_mut()
        .find(|a| a.id == AssignmentId::new(id))
    else {
        return detail(StatusCode::NOT_FOUND, "Assignment not found");
    };
    if assignment.status != AssignmentStatus::Submitted {
        return detail(StatusCode::BAD_REQUEST, "Assignment already has a tutor");
    }

    assignment.tutor_id = Some(tutor.id);
    assignment.tutor = Some(tutor);
    assignment.status = AssignmentStatus::Assigned;
    assignment.updated_at = Utc::now();
    Json(assignment.clone()).into_response()
}

#[derive(Deserialize)]
struct StatusBody {
    status: AssignmentStatus,
    description: Option<String>,
}

async fn assignments_status(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Response {
    hit(&state, "update_status");
    pause(&state, "update_status").await;
    if let Err(response) = bearer_user(&state, &headers) {
        return response;
    }

    let mut data = state.data.lock().expect("lock");
    let Some(assignment) = data
        .assignments
        .iter_mut()
        .find(|a| a.id == AssignmentId::new(id))
    else {
        return detail(StatusCode::NOT_FOUND, "Assignment not found");
    };
    if !assignment.status.can_advance_to(body.status) {
        return detail(StatusCode::BAD_REQUEST, "Invalid status transition");
    }

    assignment.status = body.status;
    if let Some(description) = body.description {
        assignment.description = Some(description);
    }
    if body.status == AssignmentStatus::Returned {
        assignment.returned_at = Some(Utc::now());
    }
    assignment.updated_at = Utc::now();
    Json(assignment.clone()).into_response()
}

async fn assignments_solution(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Response {
    hit(&state, "upload_solution");
    pause(&state, "upload_solution").await;
    if let Err(response) = bearer_user(&state, &headers) {
        return response;
    }

    let mut file_name = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_owned();
            if field.bytes().await.is_ok() && !filename.is_empty() {
                file_name = Some(filename);
            }
        }
    }
    let Some(file_name) = file_name else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "file is required");
    };

    let mut data = state.data.lock().expect("lock");
    let Some(assignment) = data
        .assignments
        .iter_mut()
        .find(|a| a.id == AssignmentId::new(id))
    else {
        return detail(StatusCode::NOT_FOUND, "Assignment not found");
    };

    assignment.solution_file_path = Some(format!("solutions/{id}/{file_name}"));
    assignment.updated_at = Utc::now();
    Json(assignment.clone()).into_response()
}

// =============================================================================
// Subjects
// =============================================================================

async fn subjects_list(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    hit(&state, "list_subjects");
    pause(&state, "list_subjects").await;
    if let Err(response) = bearer_user(&state, &headers) {
        return response;
    }
    let data = state.data.lock().expect("lock");
    Json(data.subjects.clone()).into_response()
}

#[derive(Deserialize)]
struct SubjectBody {
    name: String,
    description: Option<String>,
}

async fn subjects_create(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<SubjectBody>,
) -> Response {
    hit(&state, "create_subject");
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if user.role != Role::Admin {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    let mut data = state.data.lock().expect("lock");
    data.next_subject += 1;
    let subject = Subject {
        id: SubjectId::new(data.next_subject),
        name: body.name,
        description: body.description,
    };
    data.subjects.push(subject.clone());
    (StatusCode::CREATED, Json(subject)).into_response()
}

async fn subjects_update(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<SubjectBody>,
) -> Response {
    hit(&state, "update_subject");
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if user.role != Role::Admin {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    let mut data = state.data.lock().expect("lock");
    let Some(subject) = data
        .subjects
        .iter_mut()
        .find(|s| s.id == SubjectId::new(id))
    else {
        return detail(StatusCode::NOT_FOUND, &format!("Subject with ID {id} not found"));
    };
    subject.name = body.name;
    subject.description = body.description;
    Json(subject.clone()).into_response()
}

async fn subjects_delete(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    hit(&state, "delete_subject");
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };
    if user.role != Role::Admin {
        return detail(StatusCode::FORBIDDEN, "Not enough permissions");
    }
    let mut data = state.data.lock().expect("lock");
    let before = data.subjects.len();
    data.subjects.retain(|s| s.id != SubjectId::new(id));
    if data.subjects.len() == before {
        return detail(StatusCode::NOT_FOUND, &format!("Subject with ID {id} not found"));
    }
    Json(json!({ "message": "Subject deleted" })).into_response()
}

// =============================================================================
// Comments
// =============================================================================

async fn comments_list(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    hit(&state, "list_comments");
    pause(&state, "list_comments").await;
    if let Err(response) = bearer_user(&state, &headers) {
        return response;
    }
    let data = state.data.lock().expect("lock");
    let thread: Vec<_> = data
        .comments
        .iter()
        .filter(|c| c.assignment_id == AssignmentId::new(id))
        .cloned()
        .collect();
    Json(thread).into_response()
}

#[derive(Deserialize)]
struct CommentBody {
    text: String,
    assignment_id: i32,
}

async fn comments_create(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<CommentBody>,
) -> Response {
    hit(&state, "create_comment");
    let user = match bearer_user(&state, &headers) {
        Ok(user) => user,
        Err(response) => return response,
    };

    let mut data = state.data.lock().expect("lock");
    let assignment_id = AssignmentId::new(body.assignment_id);
    if !data.assignments.iter().any(|a| a.id == assignment_id) {
        return detail(StatusCode::NOT_FOUND, "Assignment not found");
    }

    data.next_comment += 1;
    let comment = Comment {
        id: CommentId::new(data.next_comment),
        text: body.text,
        user_id: user.id,
        assignment_id,
        created_at: Utc::now(),
        user,
    };
    data.comments.push(comment.clone());
    (StatusCode::CREATED, Json(comment)).into_response()
}
