//! Project model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
}

/// Collaboration project. Members are looked up in the membership table by
/// project id; the entity itself carries only foreign-key ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: String, description: Option<String>, creator_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            description,
            status: ProjectStatus::Active,
            creator_id,
            created_at: now,
            updated_at: now,
        }
    }
}
