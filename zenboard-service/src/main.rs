use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use zenboard_core::observability::logging::init_tracing;

use zenboard_service::config::ZenboardConfig;
use zenboard_service::services::{
    promote_first_principal_to_admin, AuthorizationEngine, Database, IdentityResolver,
    LoginOrchestrator, SessionStore, SystemClock, TokenService, WeChatProvider,
};
use zenboard_service::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<(), zenboard_core::error::AppError> {
    // Load configuration - fail fast if invalid.
    let config = ZenboardConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        environment = ?config.environment,
        "Starting zenboard service"
    );

    let clock = Arc::new(SystemClock);
    let db = Database::new();

    let provider = Arc::new(
        WeChatProvider::new(&config.provider)
            .map_err(zenboard_core::error::AppError::InternalError)?,
    );
    let tokens = TokenService::new(&config.jwt, clock.clone());
    let sessions = Arc::new(SessionStore::new(
        config.login.session_ttl_seconds,
        clock.clone(),
    ));
    let login = Arc::new(LoginOrchestrator::new(
        sessions.clone(),
        provider,
        IdentityResolver::new(db.clone()),
        tokens.clone(),
    ));
    let authz = AuthorizationEngine::new(db.clone());

    promote_first_principal_to_admin(&db).await;

    let state = AppState {
        config: config.clone(),
        db,
        tokens,
        sessions,
        login,
        authz,
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        zenboard_core::error::AppError::InternalError(anyhow::anyhow!(
            "Failed to bind {}: {}",
            addr,
            e
        ))
    })?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| zenboard_core::error::AppError::InternalError(anyhow::anyhow!(e)))?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
