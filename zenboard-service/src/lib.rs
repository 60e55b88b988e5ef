pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use zenboard_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};

use crate::config::ZenboardConfig;
use crate::services::{
    AuthorizationEngine, Database, LoginOrchestrator, SessionStore, TokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: ZenboardConfig,
    pub db: Database,
    pub tokens: TokenService,
    pub sessions: Arc<SessionStore>,
    pub login: Arc<LoginOrchestrator>,
    pub authz: AuthorizationEngine,
}

pub fn build_router(state: AppState) -> Router {
    // Everything a signed-in principal touches sits behind the bearer gate.
    let protected = Router::new()
        .route("/users/me", get(handlers::users::get_me))
        .route("/users", get(handlers::users::list_users))
        .route("/users/:id", axum::routing::patch(handlers::users::update_user))
        .route("/users/:id/approve", post(handlers::users::approve_user))
        .route("/users/:id/reject", post(handlers::users::reject_user))
        .route(
            "/projects",
            post(handlers::projects::create_project).get(handlers::projects::list_projects),
        )
        .route(
            "/projects/:id",
            get(handlers::projects::get_project).patch(handlers::projects::update_project),
        )
        .route(
            "/projects/:id/members",
            post(handlers::projects::add_member).delete(handlers::projects::remove_member),
        )
        .route(
            "/tasks",
            post(handlers::tasks::create_task).get(handlers::tasks::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(handlers::tasks::get_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route(
            "/tasks/:id/comments",
            post(handlers::comments::create_task_comment)
                .get(handlers::comments::list_task_comments),
        )
        .route(
            "/documents",
            post(handlers::documents::create_document).get(handlers::documents::list_documents),
        )
        .route(
            "/documents/:id",
            get(handlers::documents::get_document)
                .patch(handlers::documents::update_document)
                .delete(handlers::documents::delete_document),
        )
        .route(
            "/documents/:id/comments",
            post(handlers::comments::create_document_comment)
                .get(handlers::comments::list_document_comments),
        )
        .route("/comments/:id", delete(handlers::comments::delete_comment))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        // The handshake endpoints are anonymous by definition.
        .route("/auth/login/start", post(handlers::auth::start_login))
        .route("/auth/login/callback", get(handlers::auth::login_callback))
        .route("/auth/login/status", get(handlers::auth::login_status))
        .route("/auth/token/refresh", post(handlers::auth::refresh_token))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::password_login))
        .merge(protected)
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(zenboard_core::middleware::tracing::REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config))
}

fn cors_layer(config: &ZenboardConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(
            config
                .security
                .allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!(origin = %origin, error = %e, "Skipping invalid CORS origin");
                        None
                    }
                })
                .collect::<Vec<HeaderValue>>(),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
