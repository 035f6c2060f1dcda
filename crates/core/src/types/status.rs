//! Assignment lifecycle status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an assignment.
///
/// The lifecycle runs `submitted → assigned → in_progress → completed →
/// returned`. The server enforces ordering; the portal only uses the
/// advisory helpers below to decide which transitions a page offers, and it
/// never rewrites a status locally - slice state always reflects the
/// representation the server returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Created by a student; no tutor bound yet.
    #[default]
    Submitted,
    /// An admin has bound a tutor.
    Assigned,
    /// The tutor is working on the review.
    InProgress,
    /// Review finished; a solution may be attached.
    Completed,
    /// Handed back to the student.
    Returned,
}

impl AssignmentStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Submitted,
        Self::Assigned,
        Self::InProgress,
        Self::Completed,
        Self::Returned,
    ];

    /// Statuses a tutor's status-update form may offer from `self`.
    ///
    /// No transition is reversible and none may be skipped through this
    /// client. `assigned` is reachable only through the admin assign-tutor
    /// operation, so it never appears here.
    #[must_use]
    pub const fn successors(self) -> &'static [Self] {
        match self {
            Self::Submitted => &[],
            Self::Assigned => &[Self::InProgress],
            Self::InProgress => &[Self::Completed],
            Self::Completed => &[Self::Returned],
            Self::Returned => &[],
        }
    }

    /// Whether moving from `self` to `next` follows the lifecycle order.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        self.successors().contains(&next)
    }

    /// Whether a tutor reference must be present for this status.
    ///
    /// Invariant from the data model: a tutor is bound if and only if the
    /// status is `assigned` or later.
    #[must_use]
    pub const fn requires_tutor(self) -> bool {
        !matches!(self, Self::Submitted)
    }

    /// The wire representation used by the upstream API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Returned => "returned",
        }
    }

    /// Human-readable label for page rendering.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Returned => "Returned",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "returned" => Ok(Self::Returned),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Error returned when a status string is not part of the lifecycle.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown assignment status: {0}")]
pub struct UnknownStatus(pub String);
