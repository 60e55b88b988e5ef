//! Principal management handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use zenboard_core::error::AppError;

use crate::dtos::user::{ListUsersQuery, UpdateUserRequest};
use crate::middleware::AuthPrincipal;
use crate::models::AccountStatus;
use crate::services::ServiceError;
use crate::utils::ValidatedJson;
use crate::AppState;

/// GET /users/me
pub async fn get_me(AuthPrincipal(principal): AuthPrincipal) -> impl IntoResponse {
    (StatusCode::OK, Json(principal.sanitized()))
}

/// GET /users - admin only, optional status filter.
pub async fn list_users(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    if !principal.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators may list users".to_string(),
        ));
    }

    let users: Vec<_> = state
        .db
        .list_principals(query.status)
        .await
        .iter()
        .map(|p| p.sanitized())
        .collect();
    Ok((StatusCode::OK, Json(users)))
}

/// PATCH /users/:id - admins may edit anyone, members only themselves.
pub async fn update_user(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(user_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !principal.is_admin() && principal.id != user_id {
        return Err(AppError::Forbidden(
            "Cannot modify another user's profile".to_string(),
        ));
    }

    // Same uniqueness rule as registration: an email may back one account.
    if let Some(email) = &req.email {
        if let Some(holder) = state.db.find_principal_by_email(email).await {
            if holder.id != user_id {
                return Err(ServiceError::EmailAlreadyRegistered.into());
            }
        }
    }

    let updated = state
        .db
        .update_principal_profile(user_id, req.name, req.email, req.avatar_url)
        .await
        .ok_or(ServiceError::PrincipalNotFound)
        .map_err(AppError::from)?;

    Ok((StatusCode::OK, Json(updated.sanitized())))
}

/// POST /users/:id/approve - admin review action, PendingReview -> Active.
pub async fn approve_user(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    review_transition(&state, &principal, user_id, AccountStatus::Active).await
}

/// POST /users/:id/reject - admin review action, PendingReview -> Rejected.
pub async fn reject_user(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    review_transition(&state, &principal, user_id, AccountStatus::Rejected).await
}

async fn review_transition(
    state: &AppState,
    reviewer: &crate::models::Principal,
    user_id: i64,
    to: AccountStatus,
) -> Result<(StatusCode, Json<crate::models::principal::SanitizedPrincipal>), AppError> {
    if !reviewer.is_admin() {
        return Err(AppError::Forbidden(
            "Only administrators may review accounts".to_string(),
        ));
    }

    let target = state
        .db
        .find_principal_by_id(user_id)
        .await
        .ok_or(ServiceError::PrincipalNotFound)
        .map_err(AppError::from)?;

    // Review is a one-shot transition out of PendingReview.
    if target.status != AccountStatus::PendingReview {
        return Err(ServiceError::NotPendingReview.into());
    }

    let updated = state
        .db
        .update_principal_status(user_id, to)
        .await
        .ok_or(ServiceError::PrincipalNotFound)
        .map_err(AppError::from)?;

    tracing::info!(
        reviewer_id = reviewer.id,
        principal_id = user_id,
        status = ?to,
        "Account review applied"
    );

    Ok((StatusCode::OK, Json(updated.sanitized())))
}
