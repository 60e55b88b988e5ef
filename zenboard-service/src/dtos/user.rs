use serde::Deserialize;
use validator::Validate;

use crate::models::AccountStatus;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}
