use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::{TaskPriority, Visibility};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content: Option<String>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub specific_user_ids: Vec<i64>,
    #[serde(default)]
    pub subtasks: Vec<SubtaskRequest>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SubtaskRequest {
    pub title: String,
    pub content: Option<String>,
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<i64>,
    pub visibility: Option<Visibility>,
    pub specific_user_ids: Option<Vec<i64>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub project_id: Option<i64>,
}
