//! Authentication handlers: QR/OAuth handshake, token refresh and the
//! direct email/password path.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use zenboard_core::error::AppError;

use crate::dtos::auth::{
    CallbackQuery, PasswordLoginRequest, RefreshRequest, RegisterRequest, StatusQuery,
    TokenResponse,
};
use crate::models::Principal;
use crate::services::ServiceError;
use crate::utils::{hash_password, verify_password, Password, PasswordHashString, ValidatedJson};
use crate::AppState;

/// POST /auth/login/start
///
/// Opens a handshake session and returns the URL to render as a QR code.
/// The session id is the only thing the anonymous browser ever holds.
pub async fn start_login(State(state): State<AppState>) -> impl IntoResponse {
    let started = state.login.start_login();
    (StatusCode::OK, Json(started))
}

/// GET /auth/login/callback?proof=..&state=<session_id>
///
/// Called by the provider after the user scans and approves. Completes the
/// session; the polling browser picks the result up on its next poll.
pub async fn login_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Html<&'static str>, AppError> {
    state
        .login
        .handle_provider_callback(&query.proof, &query.state)
        .await?;

    // Shown inside the provider's in-app browser on the phone.
    Ok(Html(
        "<html><body><h1>Login successful</h1>\
         <p>Return to your desktop to continue.</p></body></html>",
    ))
}

/// GET /auth/login/status?session_id=..
pub async fn login_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.login.poll_status(&query.session_id)?;
    Ok((StatusCode::OK, Json(view)))
}

/// POST /auth/token/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (access_token, refresh_token) = state.tokens.refresh(&req.refresh_token)?;
    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: state.tokens.access_token_expiry_seconds(),
        }),
    ))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.db.find_principal_by_email(&req.email).await.is_some() {
        return Err(ServiceError::EmailAlreadyRegistered.into());
    }

    let hash = hash_password(&Password::new(req.password)).map_err(AppError::InternalError)?;
    let principal = state
        .db
        .insert_principal(Principal::from_registration(
            req.email,
            req.name,
            hash.into_string(),
        ))
        .await;

    let (access_token, refresh_token) = state
        .tokens
        .issue_pair(principal.id)
        .map_err(AppError::InternalError)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "principal": principal.sanitized(),
            "tokens": TokenResponse {
                access_token,
                refresh_token,
                token_type: "Bearer".to_string(),
                expires_in: state.tokens.access_token_expiry_seconds(),
            },
        })),
    ))
}

/// POST /auth/login
pub async fn password_login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PasswordLoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let principal = state
        .db
        .find_principal_by_email(&req.email)
        .await
        .ok_or_else(|| AppError::from(ServiceError::InvalidCredentials))?;

    let hash = principal
        .password_hash
        .clone()
        .map(PasswordHashString::new)
        .ok_or_else(|| AppError::from(ServiceError::InvalidCredentials))?;

    verify_password(&Password::new(req.password), &hash)
        .map_err(|_| AppError::from(ServiceError::InvalidCredentials))?;

    let (access_token, refresh_token) = state
        .tokens
        .issue_pair(principal.id)
        .map_err(AppError::InternalError)?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: state.tokens.access_token_expiry_seconds(),
        }),
    ))
}
