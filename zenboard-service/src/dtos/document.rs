use serde::Deserialize;
use validator::Validate;

use crate::models::Visibility;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub content: String,
    pub project_id: Option<i64>,
    pub visibility: Visibility,
    #[serde(default)]
    pub specific_user_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub project_id: Option<i64>,
    pub visibility: Option<Visibility>,
    pub specific_user_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub project_id: Option<i64>,
    pub author_id: Option<i64>,
}
