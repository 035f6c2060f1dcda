//! Assignment representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Subject, UserSummary};
use crate::types::{AssignmentId, AssignmentStatus, SubjectId, UserId};

/// An assignment as returned by the upstream API.
///
/// Always references exactly one student and one subject; the tutor
/// reference is present if and only if the status is `assigned` or later
/// (server-enforced). Assignments are never deleted through this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub submission_text: Option<String>,
    /// Server-relative path of the uploaded submission file, if any.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Server-relative path of the tutor's solution file, if any.
    #[serde(default)]
    pub solution_file_path: Option<String>,
    pub status: AssignmentStatus,
    pub student_id: UserId,
    #[serde(default)]
    pub tutor_id: Option<UserId>,
    pub subject_id: SubjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,

    // Related representations embedded by the API
    pub student: UserSummary,
    #[serde(default)]
    pub tutor: Option<UserSummary>,
    pub subject: Subject,
}

impl Assignment {
    /// Whether the embedded references satisfy the tutor-presence invariant.
    ///
    /// Advisory only; used by tests and debug assertions, never to rewrite
    /// server state.
    #[must_use]
    pub const fn tutor_reference_consistent(&self) -> bool {
        self.status.requires_tutor() == self.tutor_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Email, Role};
    use chrono::TimeZone;

    fn student() -> UserSummary {
        UserSummary {
            id: UserId::new(5),
            name: "Sam Student".to_owned(),
            email: Email::parse("sam@example.com").expect("valid"),
            role: Role::Student,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("ts"),
        }
    }

    #[test]
    fn test_deserializes_api_shape() {
        let json = serde_json::json!({
            "id": 42,
            "title": "Algebra HW",
            "description": null,
            "submission_text": "See attached",
            "file_path": null,
            "solution_file_path": null,
            "status": "submitted",
            "student_id": 5,
            "tutor_id": null,
            "subject_id": 3,
            "created_at": "2024-03-01T10:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z",
            "returned_at": null,
            "student": {
                "id": 5,
                "name": "Sam Student",
                "email": "sam@example.com",
                "role": "student",
                "created_at": "2024-01-01T00:00:00Z"
            },
            "tutor": null,
            "subject": {"id": 3, "name": "Algebra", "description": null}
        });

        let assignment: Assignment = serde_json::from_value(json).expect("deserialize");
        assert_eq!(assignment.id, AssignmentId::new(42));
        assert_eq!(assignment.status, AssignmentStatus::Submitted);
        assert_eq!(assignment.submission_text.as_deref(), Some("See attached"));
        assert!(assignment.tutor_id.is_none());
        assert!(assignment.tutor_reference_consistent());
    }

    #[test]
    fn test_tutor_invariant_check() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).single().expect("ts");
        let assignment = Assignment {
            id: AssignmentId::new(1),
            title: "Essay".to_owned(),
            description: None,
            submission_text: None,
            file_path: None,
            solution_file_path: None,
            status: AssignmentStatus::Assigned,
            student_id: UserId::new(5),
            tutor_id: None,
            subject_id: SubjectId::new(3),
            created_at: ts,
            updated_at: ts,
            returned_at: None,
            student: student(),
            tutor: None,
            subject: Subject {
                id: SubjectId::new(3),
                name: "Algebra".to_owned(),
                description: None,
            },
        };
        // assigned status with no tutor violates the invariant
        assert!(!assignment.tutor_reference_consistent());
    }
}
