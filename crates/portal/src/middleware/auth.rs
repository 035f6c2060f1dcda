//! Authentication extractor and the capability gate.
//!
//! The gate runs synchronously on every navigation (apart from the cookie
//! session read): no session context redirects to the login page; a session
//! whose role lacks the page's capability redirects to the dashboard. These
//! checks are advisory UI gating only - the API server enforces permissions
//! authoritatively.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

use tutorhub_core::{Capability, Role};

use crate::context::SessionContext;
use crate::models::keys;
use crate::state::AppState;

/// Extractor that requires a live session context.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(ctx): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", ctx.user().name)
/// }
/// ```
pub struct RequireAuth(pub Arc<SessionContext>);

/// Why a navigation was rejected.
#[derive(Debug)]
pub enum AuthRejection {
    /// No session (or a dangling one) - go log in.
    RedirectToLogin,
    /// Authenticated but lacking the page's capability - back to the
    /// default landing page.
    RedirectToDashboard,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::RedirectToDashboard => Redirect::to("/dashboard").into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::RedirectToLogin)?;

        let context_id: Uuid = session
            .get(keys::CONTEXT_ID)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::RedirectToLogin)?;

        // A context id surviving a portal restart is dangling; treat it as
        // logged out.
        let context = state
            .contexts()
            .get(context_id)
            .await
            .ok_or(AuthRejection::RedirectToLogin)?;

        Ok(Self(context))
    }
}

/// Gate a page on a capability of the session's role.
///
/// # Errors
///
/// Returns [`AuthRejection::RedirectToDashboard`] if the role lacks the
/// capability.
pub fn guard(role: Role, capability: Capability) -> Result<(), AuthRejection> {
    if role.can(capability) {
        Ok(())
    } else {
        Err(AuthRejection::RedirectToDashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_allows_granted_capability() {
        assert!(guard(Role::Admin, Capability::ManageSubjects).is_ok());
        assert!(guard(Role::Student, Capability::SubmitAssignments).is_ok());
    }

    #[test]
    fn test_guard_redirects_missing_capability() {
        assert!(matches!(
            guard(Role::Student, Capability::ManageSubjects),
            Err(AuthRejection::RedirectToDashboard)
        ));
        assert!(matches!(
            guard(Role::Tutor, Capability::AssignTutors),
            Err(AuthRejection::RedirectToDashboard)
        ));
    }
}
