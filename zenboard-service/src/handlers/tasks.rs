//! Task handlers.
//!
//! Every read goes through the authorization engine against the task's ACL.
//! Existence is checked first, so a hidden task 403s rather than 404s and a
//! missing one never leaks a Forbidden.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use zenboard_core::error::AppError;

use crate::dtos::task::{CreateTaskRequest, ListTasksQuery, SubtaskRequest, UpdateTaskRequest};
use crate::middleware::AuthPrincipal;
use crate::models::{Action, Subtask, Task, TaskPriority, Visibility};
use crate::utils::ValidatedJson;
use crate::AppState;

fn build_subtask(req: SubtaskRequest) -> Subtask {
    Subtask {
        id: Uuid::new_v4().to_string(),
        title: req.title,
        content: req.content,
        assignee_id: req.assignee_id,
        created_at: Utc::now(),
    }
}

async fn load_task(state: &AppState, id: i64) -> Result<Task, AppError> {
    state
        .db
        .find_task_by_id(id)
        .await
        .ok_or_else(|| AppError::not_found("Task not found"))
}

/// POST /tasks
pub async fn create_task(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    ValidatedJson(req): ValidatedJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Creating into a project requires being able to see that project.
    if let Some(project_id) = req.project_id {
        let project = state
            .db
            .find_project_by_id(project_id)
            .await
            .ok_or_else(|| AppError::not_found("Project not found"))?;
        let acl = crate::models::ResourceAcl {
            owner_id: project.creator_id,
            visibility: Visibility::ProjectScoped,
            project_id: Some(project.id),
            grantees: Vec::new(),
        };
        if !state.authz.check(&principal, &acl, Action::Read).await {
            return Err(AppError::Forbidden("No access to this project".to_string()));
        }
    }

    let visibility = req.visibility.unwrap_or(if req.project_id.is_some() {
        Visibility::ProjectScoped
    } else {
        Visibility::Private
    });
    if visibility == Visibility::ProjectScoped && req.project_id.is_none() {
        return Err(AppError::BadRequest {
            code: "ValidationError",
            message: "Project-scoped tasks need a project_id".to_string(),
        });
    }

    let now = Utc::now();
    let task = Task {
        id: 0,
        title: req.title,
        content: req.content,
        priority: req.priority.unwrap_or(TaskPriority::Medium),
        project_id: req.project_id,
        creator_id: principal.id,
        assignee_id: req.assignee_id,
        visibility,
        specific_user_ids: req.specific_user_ids,
        subtasks: req.subtasks.into_iter().map(build_subtask).collect(),
        start_date: req.start_date,
        end_date: req.end_date,
        created_at: now,
        updated_at: now,
    };

    let task = state.db.insert_task(task).await;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks - tasks the caller can read, optionally scoped to a project.
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(query): Query<ListTasksQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut visible = Vec::new();
    for task in state.db.list_tasks(query.project_id).await {
        if state.authz.check(&principal, &task.acl(), Action::Read).await {
            visible.push(task);
        }
    }
    Ok((StatusCode::OK, Json(visible)))
}

/// GET /tasks/:id
pub async fn get_task(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let task = load_task(&state, id).await?;
    if !state.authz.check(&principal, &task.acl(), Action::Read).await {
        return Err(AppError::Forbidden("No access to this task".to_string()));
    }
    Ok((StatusCode::OK, Json(task)))
}

/// PATCH /tasks/:id
pub async fn update_task(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut task = load_task(&state, id).await?;
    if !state.authz.check(&principal, &task.acl(), Action::Write).await {
        return Err(AppError::Forbidden("No access to this task".to_string()));
    }

    if let Some(title) = req.title {
        task.title = title;
    }
    if let Some(content) = req.content {
        task.content = Some(content);
    }
    if let Some(priority) = req.priority {
        task.priority = priority;
    }
    if let Some(assignee_id) = req.assignee_id {
        task.assignee_id = Some(assignee_id);
    }
    if let Some(visibility) = req.visibility {
        if visibility == Visibility::ProjectScoped && task.project_id.is_none() {
            return Err(AppError::BadRequest {
                code: "ValidationError",
                message: "Project-scoped tasks need a project_id".to_string(),
            });
        }
        task.visibility = visibility;
    }
    if let Some(specific_user_ids) = req.specific_user_ids {
        task.specific_user_ids = specific_user_ids;
    }
    if let Some(start_date) = req.start_date {
        task.start_date = Some(start_date);
    }
    if let Some(end_date) = req.end_date {
        task.end_date = Some(end_date);
    }

    let updated = state
        .db
        .update_task(task)
        .await
        .ok_or_else(|| AppError::not_found("Task not found"))?;
    Ok((StatusCode::OK, Json(updated)))
}

/// DELETE /tasks/:id
pub async fn delete_task(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let task = load_task(&state, id).await?;
    if !state.authz.check(&principal, &task.acl(), Action::Write).await {
        return Err(AppError::Forbidden("No access to this task".to_string()));
    }

    state.db.delete_task(id).await;
    Ok(StatusCode::NO_CONTENT)
}
