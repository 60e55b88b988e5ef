//! Comment model, shared by tasks and documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum CommentParent {
    Task(i64),
    Document(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub parent: CommentParent,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(parent: CommentParent, author_id: i64, content: String) -> Self {
        Self {
            id: 0,
            parent,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }
}
