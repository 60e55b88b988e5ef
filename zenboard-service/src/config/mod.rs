use serde::Deserialize;
use std::env;
use zenboard_core::config as core_config;
use zenboard_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct ZenboardConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub jwt: JwtConfig,
    pub login: LoginConfig,
    pub provider: ProviderConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// Token signing configuration. The secret is a symmetric HMAC key; there
/// is no module-level default in prod - startup fails without it.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
}

/// QR/OAuth handshake configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginConfig {
    pub session_ttl_seconds: i64,
}

/// External login provider (WeChat open platform) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub app_id: String,
    pub app_secret: String,
    pub redirect_uri: String,
    pub api_base: String,
    pub authorize_base: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

impl ZenboardConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let is_prod = environment == Environment::Prod;

        let config = ZenboardConfig {
            common,
            environment,
            service_name: get_env("SERVICE_NAME", Some("zenboard-service"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            jwt: JwtConfig {
                secret: get_env(
                    "JWT_SECRET",
                    Some("dev-secret-change-in-production-32b"),
                    is_prod,
                )?,
                access_token_expiry_minutes: parse_env(
                    "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                    Some("30"),
                    is_prod,
                )?,
                refresh_token_expiry_days: parse_env(
                    "JWT_REFRESH_TOKEN_EXPIRY_DAYS",
                    Some("7"),
                    is_prod,
                )?,
            },
            login: LoginConfig {
                session_ttl_seconds: parse_env("LOGIN_SESSION_TTL_SECONDS", Some("300"), is_prod)?,
            },
            provider: ProviderConfig {
                app_id: get_env("WECHAT_APP_ID", Some("wx-dev-app-id"), is_prod)?,
                app_secret: get_env("WECHAT_APP_SECRET", Some("wx-dev-app-secret"), is_prod)?,
                redirect_uri: get_env(
                    "WECHAT_REDIRECT_URI",
                    Some("http://localhost:8080/auth/login/callback"),
                    is_prod,
                )?,
                api_base: get_env(
                    "WECHAT_API_BASE",
                    Some("https://api.weixin.qq.com"),
                    is_prod,
                )?,
                authorize_base: get_env(
                    "WECHAT_AUTHORIZE_BASE",
                    Some("https://open.weixin.qq.com"),
                    is_prod,
                )?,
                request_timeout_seconds: parse_env(
                    "PROVIDER_REQUEST_TIMEOUT_SECONDS",
                    Some("10"),
                    is_prod,
                )?,
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000,http://localhost:5173"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
        };

        Ok(config)
    }
}

/// Read an environment variable. In prod a missing value without a default
/// is a startup failure; in dev the default applies.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(value) => Ok(value),
        Err(_) => match default {
            Some(value) if !is_prod => Ok(value.to_string()),
            _ => Err(AppError::ConfigError(anyhow::anyhow!(
                "Missing required environment variable {}",
                key
            ))),
        },
    }
}

fn parse_env<T>(key: &str, default: Option<&str>, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, default, is_prod)?.parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
    })
}
