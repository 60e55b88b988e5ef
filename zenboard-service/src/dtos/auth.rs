use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query params from the provider callback. `state` carries the session id
/// the handshake was started with.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub proof: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub session_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordLoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Token pair returned to an authenticated client.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
