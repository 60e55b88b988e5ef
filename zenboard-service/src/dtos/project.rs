use serde::Deserialize;
use validator::Validate;

use crate::models::{ProjectRole, ProjectStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub principal_id: i64,
    pub role: ProjectRole,
}

#[derive(Debug, Deserialize)]
pub struct RemoveMemberRequest {
    pub principal_id: i64,
}
