//! Session-related types.
//!
//! Types stored in the cookie session for authentication state. The bearer
//! token itself never enters the cookie; it lives server-side in the
//! [`SessionContext`](crate::context::SessionContext) the cookie points at.

use serde::{Deserialize, Serialize};

use tutorhub_core::{Email, Role, UserId};

/// The authenticated identity of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Server-assigned user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: Email,
    /// Role driving navigation and advisory gating.
    pub role: Role,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the id of the live [`SessionContext`] in the registry.
    ///
    /// [`SessionContext`]: crate::context::SessionContext
    pub const CONTEXT_ID: &str = "context_id";
}
