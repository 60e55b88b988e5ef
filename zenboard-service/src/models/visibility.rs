//! Resource visibility - the access-control mode attached to a resource.

use serde::{Deserialize, Serialize};

/// Visibility rule for project-scoped entities (tasks, documents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Private,
    ProjectScoped,
    SpecificUsers,
    Public,
}

/// Requested operation on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

/// Access-control view of a resource, detached from its content.
///
/// `grantees` is meaningful only under `SpecificUsers`; an empty set means
/// nobody but the owner. `project_id` must be present under `ProjectScoped`.
#[derive(Debug, Clone)]
pub struct ResourceAcl {
    pub owner_id: i64,
    pub visibility: Visibility,
    pub project_id: Option<i64>,
    pub grantees: Vec<i64>,
}

impl ResourceAcl {
    pub fn grants(&self, principal_id: i64) -> bool {
        self.grantees.contains(&principal_id)
    }
}
