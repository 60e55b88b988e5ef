//! Document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::visibility::{ResourceAcl, Visibility};

/// Markdown document with per-resource visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub project_id: Option<i64>,
    pub author_id: i64,
    pub visibility: Visibility,
    /// Meaningful only under `SpecificUsers`; empty means owner-only.
    pub specific_user_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Access-control view of this document.
    pub fn acl(&self) -> ResourceAcl {
        ResourceAcl {
            owner_id: self.author_id,
            visibility: self.visibility,
            project_id: self.project_id,
            grantees: self.specific_user_ids.clone(),
        }
    }
}
