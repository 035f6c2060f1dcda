//! User representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, Role, UserId};

/// A user as returned by the upstream API.
///
/// Read-only from the portal's perspective apart from the bootstrap
/// registration operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
