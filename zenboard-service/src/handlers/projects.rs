//! Project handlers.
//!
//! A project is itself a project-scoped resource: reads need membership,
//! writes need the project Owner/Admin role (or system admin/creator).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use zenboard_core::error::AppError;

use crate::dtos::project::{AddMemberRequest, CreateProjectRequest, RemoveMemberRequest, UpdateProjectRequest};
use crate::middleware::AuthPrincipal;
use crate::models::{Action, Principal, Project, ProjectMembership, ProjectRole, ResourceAcl, Visibility};
use crate::utils::ValidatedJson;
use crate::AppState;

fn project_acl(project: &Project) -> ResourceAcl {
    ResourceAcl {
        owner_id: project.creator_id,
        visibility: Visibility::ProjectScoped,
        project_id: Some(project.id),
        grantees: Vec::new(),
    }
}

async fn load_project(state: &AppState, id: i64) -> Result<Project, AppError> {
    state
        .db
        .find_project_by_id(id)
        .await
        .ok_or_else(|| AppError::not_found("Project not found"))
}

async fn require_access(
    state: &AppState,
    principal: &Principal,
    project: &Project,
    action: Action,
) -> Result<(), AppError> {
    if state.authz.check(principal, &project_acl(project), action).await {
        Ok(())
    } else {
        Err(AppError::Forbidden("No access to this project".to_string()))
    }
}

/// POST /projects - creator becomes the project owner.
pub async fn create_project(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let project = state
        .db
        .insert_project(Project::new(req.name, req.description, principal.id))
        .await;
    state
        .db
        .upsert_membership(ProjectMembership::new(
            project.id,
            principal.id,
            ProjectRole::Owner,
        ))
        .await;

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /projects - the projects the caller can read.
pub async fn list_projects(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    let mut visible = Vec::new();
    for project in state.db.list_projects().await {
        if state
            .authz
            .check(&principal, &project_acl(&project), Action::Read)
            .await
        {
            visible.push(project);
        }
    }
    Ok((StatusCode::OK, Json(visible)))
}

/// GET /projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let project = load_project(&state, id).await?;
    require_access(&state, &principal, &project, Action::Read).await?;

    let members = state.db.list_project_members(id).await;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "project": project, "members": members })),
    ))
}

/// PATCH /projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut project = load_project(&state, id).await?;
    require_access(&state, &principal, &project, Action::Write).await?;

    if let Some(name) = req.name {
        project.name = name;
    }
    if let Some(description) = req.description {
        project.description = Some(description);
    }
    if let Some(status) = req.status {
        project.status = status;
    }

    let updated = state
        .db
        .update_project(project)
        .await
        .ok_or_else(|| AppError::not_found("Project not found"))?;
    Ok((StatusCode::OK, Json(updated)))
}

/// POST /projects/:id/members
pub async fn add_member(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    let project = load_project(&state, id).await?;
    require_access(&state, &principal, &project, Action::Write).await?;

    if state.db.find_principal_by_id(req.principal_id).await.is_none() {
        return Err(AppError::not_found("Principal not found"));
    }

    let membership = state
        .db
        .upsert_membership(ProjectMembership::new(id, req.principal_id, req.role))
        .await;
    Ok((StatusCode::CREATED, Json(membership)))
}

/// DELETE /projects/:id/members
pub async fn remove_member(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<i64>,
    Json(req): Json<RemoveMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    let project = load_project(&state, id).await?;
    require_access(&state, &principal, &project, Action::Write).await?;

    if !state.db.remove_membership(id, req.principal_id).await {
        return Err(AppError::not_found("Membership not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
