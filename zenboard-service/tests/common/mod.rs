//! Shared in-process test harness.
//!
//! Spins the full router up behind `tower::ServiceExt::oneshot` with a
//! pinned clock and a canned identity provider, so every test exercises the
//! real middleware and handler stack without network or external services.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use zenboard_service::config::{
    Environment, JwtConfig, LoginConfig, ProviderConfig, SecurityConfig, ZenboardConfig,
};
use zenboard_service::models::{AccountStatus, Role};
use zenboard_service::services::{
    AuthorizationEngine, Database, ExternalIdentity, IdentityProvider, IdentityResolver,
    LoginOrchestrator, ManualClock, ProviderError, SessionStore, TokenService,
};
use zenboard_service::{build_router, AppState};

pub const SESSION_TTL_SECONDS: i64 = 300;

/// Canned provider. Any proof starting with `fail` errors the exchange; any
/// other proof resolves to a deterministic external identity derived from it.
pub struct FakeProvider;

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn exchange(&self, proof: &str) -> Result<ExternalIdentity, ProviderError> {
        if proof.starts_with("fail") {
            return Err(ProviderError("exchange rejected upstream".to_string()));
        }
        Ok(ExternalIdentity {
            external_id: format!("ext-{}", proof),
            name: Some(format!("Scan User {}", proof)),
            avatar_url: None,
        })
    }

    fn authorize_url(&self, session_id: &str) -> String {
        format!("https://provider.test/qrconnect?state={}", session_id)
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Database,
    pub clock: ManualClock,
    pub state: AppState,
}

pub fn test_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

fn test_config() -> ZenboardConfig {
    ZenboardConfig {
        common: zenboard_core::config::Config { port: 0 },
        environment: Environment::Dev,
        service_name: "zenboard-service-test".to_string(),
        log_level: "warn".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-not-for-production-32b".to_string(),
            access_token_expiry_minutes: 5,
            refresh_token_expiry_days: 7,
        },
        login: LoginConfig {
            session_ttl_seconds: SESSION_TTL_SECONDS,
        },
        provider: ProviderConfig {
            app_id: "wx-test-app".to_string(),
            app_secret: "wx-test-secret".to_string(),
            redirect_uri: "http://localhost:8080/auth/login/callback".to_string(),
            api_base: "https://api.weixin.qq.com".to_string(),
            authorize_base: "https://open.weixin.qq.com".to_string(),
            request_timeout_seconds: 2,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

impl TestApp {
    pub fn spawn() -> Self {
        let config = test_config();
        let clock = ManualClock::new(test_epoch());
        let clock_arc = Arc::new(clock.clone());
        let db = Database::new();

        let tokens = TokenService::new(&config.jwt, clock_arc.clone());
        let sessions = Arc::new(SessionStore::new(
            config.login.session_ttl_seconds,
            clock_arc,
        ));
        let login = Arc::new(LoginOrchestrator::new(
            sessions.clone(),
            Arc::new(FakeProvider),
            IdentityResolver::new(db.clone()),
            tokens.clone(),
        ));

        let state = AppState {
            config,
            db: db.clone(),
            tokens: tokens.clone(),
            sessions,
            login,
            authz: AuthorizationEngine::new(db.clone()),
        };

        TestApp {
            router: build_router(state.clone()),
            db,
            clock,
            state,
        }
    }

    pub fn advance_seconds(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }

    /// Raw request, returning (status, parsed JSON body when there is one).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never errors");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, bearer, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        bearer: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, uri, bearer, Some(body)).await
    }

    pub async fn patch(
        &self,
        uri: &str,
        bearer: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, bearer, Some(body)).await
    }

    pub async fn delete(
        &self,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, bearer, body).await
    }

    /// Register a principal and return (principal id, access token).
    pub async fn register(&self, email: &str) -> (i64, String) {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({ "email": email, "password": "correct-horse-battery", "name": email }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let id = body["principal"]["id"].as_i64().expect("principal id");
        let token = body["tokens"]["access_token"]
            .as_str()
            .expect("access token")
            .to_string();
        (id, token)
    }

    /// Promote a registered principal to an active administrator.
    pub async fn make_admin(&self, principal_id: i64) {
        self.db
            .update_principal_role(principal_id, Role::Admin)
            .await
            .expect("principal exists");
        self.db
            .update_principal_status(principal_id, AccountStatus::Active)
            .await
            .expect("principal exists");
    }
}
