//! Comment handlers.
//!
//! Commenting rides on the parent's visibility: anyone who can read the
//! task or document may comment on it. Deletion is author-or-admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use zenboard_core::error::AppError;

use crate::dtos::comment::CreateCommentRequest;
use crate::middleware::AuthPrincipal;
use crate::models::{Action, Comment, CommentParent, Principal};
use crate::utils::ValidatedJson;
use crate::AppState;

/// Resolves the parent resource's ACL, 404ing when the parent is gone.
async fn require_parent_read(
    state: &AppState,
    principal: &Principal,
    parent: CommentParent,
) -> Result<(), AppError> {
    let acl = match parent {
        CommentParent::Task(id) => state
            .db
            .find_task_by_id(id)
            .await
            .ok_or_else(|| AppError::not_found("Task not found"))?
            .acl(),
        CommentParent::Document(id) => state
            .db
            .find_document_by_id(id)
            .await
            .ok_or_else(|| AppError::not_found("Document not found"))?
            .acl(),
    };
    if state.authz.check(principal, &acl, Action::Read).await {
        Ok(())
    } else {
        Err(AppError::Forbidden("No access to this resource".to_string()))
    }
}

/// POST /tasks/:id/comments
pub async fn create_task_comment(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(task_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let parent = CommentParent::Task(task_id);
    require_parent_read(&state, &principal, parent).await?;

    let comment = state
        .db
        .insert_comment(Comment::new(parent, principal.id, req.content))
        .await;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /tasks/:id/comments
pub async fn list_task_comments(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(task_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let parent = CommentParent::Task(task_id);
    require_parent_read(&state, &principal, parent).await?;

    Ok((StatusCode::OK, Json(state.db.list_comments(parent).await)))
}

/// POST /documents/:id/comments
pub async fn create_document_comment(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(document_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let parent = CommentParent::Document(document_id);
    require_parent_read(&state, &principal, parent).await?;

    let comment = state
        .db
        .insert_comment(Comment::new(parent, principal.id, req.content))
        .await;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /documents/:id/comments
pub async fn list_document_comments(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(document_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let parent = CommentParent::Document(document_id);
    require_parent_read(&state, &principal, parent).await?;

    Ok((StatusCode::OK, Json(state.db.list_comments(parent).await)))
}

/// DELETE /comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let comment = state
        .db
        .find_comment_by_id(id)
        .await
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    if comment.author_id != principal.id && !principal.is_admin() {
        return Err(AppError::Forbidden(
            "Only the author or an admin may delete a comment".to_string(),
        ));
    }

    state.db.delete_comment(id).await;
    Ok(StatusCode::NO_CONTENT)
}
