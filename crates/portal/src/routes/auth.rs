//! Authentication route handlers.
//!
//! Login exchanges credentials for a bearer token at the upstream API, then
//! builds the session context the rest of the portal runs against. Logout
//! tears the context down and best-effort revokes the token upstream.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use tutorhub_core::Role;

use crate::context::SessionContext;
use crate::filters;
use crate::models::{CurrentUser, keys};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub role: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// Exchanges credentials for a bearer token, fetches the authenticated
/// profile, and registers a fresh session context.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = match state.api().login(&form.email, &form.password).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
    };

    let secret = SecretString::from(token.access_token);
    let profile = match state.api().current_user(&secret).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Failed to fetch profile after login: {}", e);
            return Redirect::to("/auth/login?error=profile_fetch").into_response();
        }
    };

    let user = CurrentUser {
        id: token.user_id,
        name: profile.name,
        email: profile.email,
        role: token.user_role,
    };

    let context = SessionContext::new(user, secret);
    let context_id = state.contexts().insert(context).await;

    if let Err(e) = session.insert(keys::CONTEXT_ID, context_id).await {
        tracing::error!("Failed to set session: {}", e);
        state.contexts().remove(context_id).await;
        return Redirect::to("/auth/login?error=session").into_response();
    }

    Redirect::to("/dashboard").into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
///
/// Creates the account upstream; the user then logs in normally.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    // Validate passwords match
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    // Validate password length
    if form.password.len() < 8 {
        return Redirect::to("/auth/register?error=password_too_short").into_response();
    }

    // Validate email shape before dispatching anything upstream
    if tutorhub_core::Email::parse(&form.email).is_err() {
        return Redirect::to("/auth/register?error=invalid_email").into_response();
    }

    // Self-registration offers student and tutor only
    let role = match form.role.parse::<Role>() {
        Ok(role @ (Role::Student | Role::Tutor)) => role,
        _ => return Redirect::to("/auth/register?error=invalid_role").into_response(),
    };

    let request = crate::api::RegisterRequest {
        name: form.name,
        email: form.email,
        password: form.password,
        role,
    };

    match state.api().register(&request).await {
        Ok(_) => Redirect::to("/auth/login?success=registered").into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            let error_msg = e.to_string();
            if error_msg.contains("already") {
                Redirect::to("/auth/register?error=email_taken").into_response()
            } else {
                Redirect::to("/auth/register?error=failed").into_response()
            }
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Tears down the session context, revokes the token upstream (best-effort),
/// and clears the cookie session.
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let context_id: Option<Uuid> = session.get(keys::CONTEXT_ID).await.ok().flatten();

    if let Some(id) = context_id
        && let Some(context) = state.contexts().remove(id).await
        && let Err(e) = state.api().logout(context.token()).await
    {
        tracing::warn!("Upstream logout failed: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to clear session: {}", e);
    }

    Redirect::to("/auth/login").into_response()
}
