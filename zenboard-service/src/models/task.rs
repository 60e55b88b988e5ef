//! Task model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::visibility::{ResourceAcl, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Embedded subtask. Stored inline with the task rather than as a row of
/// its own; only the assignee id matters for access decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub assignee_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Task entity. Tasks carry the same visibility fields as documents; the
/// assignee (and subtask assignees) are folded into the grantee set when
/// the ACL is built, so assignment always implies visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub priority: TaskPriority,
    pub project_id: Option<i64>,
    pub creator_id: i64,
    pub assignee_id: Option<i64>,
    pub visibility: Visibility,
    pub specific_user_ids: Vec<i64>,
    pub subtasks: Vec<Subtask>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Access-control view of this task.
    pub fn acl(&self) -> ResourceAcl {
        let mut grantees = self.specific_user_ids.clone();
        if let Some(assignee) = self.assignee_id {
            grantees.push(assignee);
        }
        grantees.extend(self.subtasks.iter().filter_map(|s| s.assignee_id));
        ResourceAcl {
            owner_id: self.creator_id,
            visibility: self.visibility,
            project_id: self.project_id,
            grantees,
        }
    }
}
