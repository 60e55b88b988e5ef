//! Project membership model - a principal's role within a project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role within a project. `Owner` and `Admin` may write project-scoped
/// resources; `Member` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Owner,
    Admin,
    Member,
}

impl ProjectRole {
    pub fn can_write(&self) -> bool {
        matches!(self, ProjectRole::Owner | ProjectRole::Admin)
    }
}

/// Unique per (project_id, principal_id); the database enforces the pair key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub project_id: i64,
    pub principal_id: i64,
    pub role: ProjectRole,
    pub joined_at: DateTime<Utc>,
}

impl ProjectMembership {
    pub fn new(project_id: i64, principal_id: i64, role: ProjectRole) -> Self {
        Self {
            project_id,
            principal_id,
            role,
            joined_at: Utc::now(),
        }
    }
}
