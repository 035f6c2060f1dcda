//! Dashboard route handler.
//!
//! One landing page for every role; the upstream API scopes the assignment
//! listing to what the session may see, so the page only varies in which
//! navigation and summary labels it renders.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use tutorhub_core::{Assignment, AssignmentStatus, NavItem};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Per-status counts for the summary row.
#[derive(Debug, Default)]
pub struct StatusCounts {
    pub submitted: usize,
    pub assigned: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub returned: usize,
}

impl StatusCounts {
    fn tally(assignments: &[Assignment]) -> Self {
        let mut counts = Self::default();
        for assignment in assignments {
            match assignment.status {
                AssignmentStatus::Submitted => counts.submitted += 1,
                AssignmentStatus::Assigned => counts.assigned += 1,
                AssignmentStatus::InProgress => counts.in_progress += 1,
                AssignmentStatus::Completed => counts.completed += 1,
                AssignmentStatus::Returned => counts.returned += 1,
            }
        }
        counts
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user_name: String,
    pub role_label: &'static str,
    pub nav: &'static [NavItem],
    pub assignments: Vec<Assignment>,
    pub counts: StatusCounts,
    /// Role-specific base path for assignment detail links.
    pub detail_prefix: &'static str,
}

/// Display the dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(ctx): RequireAuth,
) -> Result<DashboardTemplate> {
    let assignments = ctx
        .assignments()
        .fetch_all(state.api(), ctx.token())
        .await?;

    let counts = StatusCounts::tally(&assignments);
    let role = ctx.user().role;
    let detail_prefix = match role {
        tutorhub_core::Role::Admin => "/admin/assignments",
        tutorhub_core::Role::Student => "/assignments",
        tutorhub_core::Role::Tutor => "/tutor/assignments",
    };

    Ok(DashboardTemplate {
        user_name: ctx.user().name.clone(),
        role_label: role.label(),
        nav: role.nav_items(),
        assignments,
        counts,
        detail_prefix,
    })
}
