//! Subject representation.

use serde::{Deserialize, Serialize};

use crate::types::SubjectId;

/// A subject students can submit assignments under.
///
/// Created, updated, and deleted only by admin sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
