//! User roles and the capability lookup derived from them.
//!
//! Every permission question goes through one table rather than ad hoc
//! role comparisons: [`Role::capabilities`] answers "what may this role do" and
//! [`Role::nav_items`] answers "which pages does this role navigate to".

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role of an authenticated user.
///
/// Server-side enforcement is authoritative; the portal uses the role only
/// for advisory UI gating and navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Student,
    Tutor,
}

/// An operation or page family a role may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Submit new assignments and view one's own submissions.
    SubmitAssignments,
    /// Review assignments: update status, attach feedback, upload solutions.
    ReviewAssignments,
    /// Create, update, and delete subjects.
    ManageSubjects,
    /// View the full user listing.
    ManageUsers,
    /// Bind a tutor to a submitted assignment.
    AssignTutors,
    /// View assignments beyond one's own (admin overview).
    ViewAllAssignments,
    /// Read and append comments on an accessible assignment.
    Comment,
}

/// A navigation entry rendered in the layout shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    /// Human-readable label.
    pub label: &'static str,
    /// Portal-relative path.
    pub href: &'static str,
}

impl Role {
    /// All capabilities granted to this role.
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            // Admins also get the student- and tutor-facing pages.
            Self::Admin => &[
                Capability::SubmitAssignments,
                Capability::ReviewAssignments,
                Capability::ManageSubjects,
                Capability::ManageUsers,
                Capability::AssignTutors,
                Capability::ViewAllAssignments,
                Capability::Comment,
            ],
            Self::Student => &[Capability::SubmitAssignments, Capability::Comment],
            Self::Tutor => &[Capability::ReviewAssignments, Capability::Comment],
        }
    }

    /// Whether this role is granted `capability`.
    #[must_use]
    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Navigation items shown to this role, in display order.
    ///
    /// The dashboard entry is shared by every role; the rest follow the
    /// capability grants.
    #[must_use]
    pub const fn nav_items(self) -> &'static [NavItem] {
        const DASHBOARD: NavItem = NavItem {
            label: "Dashboard",
            href: "/dashboard",
        };
        match self {
            Self::Admin => &[
                DASHBOARD,
                NavItem {
                    label: "All Assignments",
                    href: "/admin",
                },
                NavItem {
                    label: "Manage Users",
                    href: "/admin/users",
                },
                NavItem {
                    label: "Manage Subjects",
                    href: "/admin/subjects",
                },
            ],
            Self::Student => &[
                DASHBOARD,
                NavItem {
                    label: "My Assignments",
                    href: "/assignments",
                },
                NavItem {
                    label: "Submit Assignment",
                    href: "/assignments/submit",
                },
            ],
            Self::Tutor => &[
                DASHBOARD,
                NavItem {
                    label: "Assigned to Me",
                    href: "/tutor/assignments",
                },
            ],
        }
    }

    /// The wire representation used by the upstream API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
            Self::Tutor => "tutor",
        }
    }

    /// Human-readable label for page rendering.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Student => "Student",
            Self::Tutor => "Tutor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "student" => Ok(Self::Student),
            "tutor" => Ok(Self::Tutor),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Error returned when a role string is not one of admin/student/tutor.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_lookup() {
        assert!(Role::Admin.can(Capability::ManageSubjects));
        assert!(Role::Admin.can(Capability::SubmitAssignments));
        assert!(Role::Student.can(Capability::SubmitAssignments));
        assert!(!Role::Student.can(Capability::ManageSubjects));
        assert!(!Role::Student.can(Capability::ReviewAssignments));
        assert!(Role::Tutor.can(Capability::ReviewAssignments));
        assert!(!Role::Tutor.can(Capability::AssignTutors));
    }

    #[test]
    fn test_every_role_navigates_to_dashboard() {
        for role in [Role::Admin, Role::Student, Role::Tutor] {
            assert_eq!(role.nav_items().first().map(|n| n.href), Some("/dashboard"));
        }
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::Student).expect("serialize"),
            "\"student\""
        );
        let role: Role = serde_json::from_str("\"tutor\"").expect("deserialize");
        assert_eq!(role, Role::Tutor);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<Role>().expect("parses"), Role::Admin);
        assert!("teacher".parse::<Role>().is_err());
    }
}
