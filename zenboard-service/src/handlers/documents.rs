//! Document handlers. Same access shape as tasks: existence first, then
//! the engine decides against the document's ACL.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use zenboard_core::error::AppError;

use crate::dtos::document::{CreateDocumentRequest, ListDocumentsQuery, UpdateDocumentRequest};
use crate::middleware::AuthPrincipal;
use crate::models::{Action, Document, Visibility};
use crate::utils::ValidatedJson;
use crate::AppState;

async fn load_document(state: &AppState, id: i64) -> Result<Document, AppError> {
    state
        .db
        .find_document_by_id(id)
        .await
        .ok_or_else(|| AppError::not_found("Document not found"))
}

/// POST /documents
pub async fn create_document(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    ValidatedJson(req): ValidatedJson<CreateDocumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.visibility == Visibility::ProjectScoped && req.project_id.is_none() {
        return Err(AppError::BadRequest {
            code: "ValidationError",
            message: "Project-scoped documents need a project_id".to_string(),
        });
    }
    if let Some(project_id) = req.project_id {
        if state.db.find_project_by_id(project_id).await.is_none() {
            return Err(AppError::not_found("Project not found"));
        }
    }

    let now = Utc::now();
    let document = Document {
        id: 0,
        title: req.title,
        content: req.content,
        project_id: req.project_id,
        author_id: principal.id,
        visibility: req.visibility,
        specific_user_ids: req.specific_user_ids,
        created_at: now,
        updated_at: now,
    };

    let document = state.db.insert_document(document).await;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /documents
pub async fn list_documents(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut visible = Vec::new();
    for document in state
        .db
        .list_documents(query.project_id, query.author_id)
        .await
    {
        if state
            .authz
            .check(&principal, &document.acl(), Action::Read)
            .await
        {
            visible.push(document);
        }
    }
    Ok((StatusCode::OK, Json(visible)))
}

/// GET /documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let document = load_document(&state, id).await?;
    if !state
        .authz
        .check(&principal, &document.acl(), Action::Read)
        .await
    {
        return Err(AppError::Forbidden("No access to this document".to_string()));
    }
    Ok((StatusCode::OK, Json(document)))
}

/// PATCH /documents/:id
pub async fn update_document(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateDocumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut document = load_document(&state, id).await?;
    if !state
        .authz
        .check(&principal, &document.acl(), Action::Write)
        .await
    {
        return Err(AppError::Forbidden("No access to this document".to_string()));
    }

    if let Some(title) = req.title {
        document.title = title;
    }
    if let Some(content) = req.content {
        document.content = content;
    }
    if let Some(project_id) = req.project_id {
        document.project_id = Some(project_id);
    }
    if let Some(visibility) = req.visibility {
        if visibility == Visibility::ProjectScoped && document.project_id.is_none() {
            return Err(AppError::BadRequest {
                code: "ValidationError",
                message: "Project-scoped documents need a project_id".to_string(),
            });
        }
        document.visibility = visibility;
    }
    if let Some(specific_user_ids) = req.specific_user_ids {
        document.specific_user_ids = specific_user_ids;
    }

    let updated = state
        .db
        .update_document(document)
        .await
        .ok_or_else(|| AppError::not_found("Document not found"))?;
    Ok((StatusCode::OK, Json(updated)))
}

/// DELETE /documents/:id - cascades to the document's comments.
pub async fn delete_document(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let document = load_document(&state, id).await?;
    if !state
        .authz
        .check(&principal, &document.acl(), Action::Write)
        .await
    {
        return Err(AppError::Forbidden("No access to this document".to_string()));
    }

    state.db.delete_document(id).await;
    Ok(StatusCode::NO_CONTENT)
}
