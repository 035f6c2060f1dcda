//! Comment representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UserSummary;
use crate::types::{AssignmentId, CommentId, UserId};

/// A comment on an assignment.
///
/// Append-only from the portal's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub user_id: UserId,
    pub assignment_id: AssignmentId,
    pub created_at: DateTime<Utc>,
    /// Author representation embedded by the API.
    pub user: UserSummary,
}
