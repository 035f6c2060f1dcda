//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Redirect to dashboard
//! GET  /health                    - Health check
//! GET  /dashboard                 - Role-specific landing page
//!
//! # Auth
//! GET  /auth/login                - Login page
//! POST /auth/login                - Login action
//! GET  /auth/register             - Register page
//! POST /auth/register             - Register action
//! POST /auth/logout               - Logout action
//!
//! # Student assignments
//! GET  /assignments               - Own assignment listing
//! GET  /assignments/submit        - Submission form
//! POST /assignments/submit        - Submission action (multipart)
//! GET  /assignments/{id}          - Assignment detail with comment thread
//! POST /assignments/{id}/comments - Append a comment
//!
//! # Tutor review
//! GET  /tutor/assignments              - Assigned listing
//! GET  /tutor/assignments/{id}         - Review page
//! POST /tutor/assignments/{id}/status  - Advance lifecycle status
//! POST /tutor/assignments/{id}/solution - Upload solution file (multipart)
//!
//! # Admin
//! GET  /admin                          - All-assignments overview
//! GET  /admin/assignments/{id}         - Assignment detail with assign form
//! POST /admin/assignments/{id}/assign  - Bind a tutor
//! GET  /admin/users                    - User listing
//! GET  /admin/subjects                 - Subject listing with create form
//! POST /admin/subjects                 - Create subject
//! POST /admin/subjects/{id}            - Update subject
//! POST /admin/subjects/{id}/delete     - Delete subject
//! ```

pub mod admin;
pub mod assignments;
pub mod auth;
pub mod dashboard;
pub mod tutor;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the student assignment routes router.
pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(assignments::index))
        .route(
            "/submit",
            get(assignments::submit_page).post(assignments::submit),
        )
        .route("/{id}", get(assignments::show))
        .route("/{id}/comments", post(assignments::comment))
}

/// Create the tutor review routes router.
pub fn tutor_routes() -> Router<AppState> {
    Router::new()
        .route("/assignments", get(tutor::index))
        .route("/assignments/{id}", get(tutor::review))
        .route("/assignments/{id}/status", post(tutor::update_status))
        .route("/assignments/{id}/solution", post(tutor::upload_solution))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/assignments/{id}", get(admin::show_assignment))
        .route("/assignments/{id}/assign", post(admin::assign_tutor))
        .route("/users", get(admin::users))
        .route(
            "/subjects",
            get(admin::subjects).post(admin::create_subject),
        )
        .route("/subjects/{id}", post(admin::update_subject))
        .route("/subjects/{id}/delete", post(admin::delete_subject))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/dashboard", get(dashboard::dashboard))
        .nest("/auth", auth_routes())
        .nest("/assignments", assignment_routes())
        .nest("/tutor", tutor_routes())
        .nest("/admin", admin_routes())
}
