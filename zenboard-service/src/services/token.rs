//! Token service - issuance and verification of signed bearer tokens.
//!
//! Tokens are self-describing and stateless: verification never touches
//! storage, which is why there is no server-side logout or revocation.
//! Compromise mitigation is the short access TTL plus refresh rotation.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::JwtConfig;

use super::clock::Clock;

/// Token verification failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Token signature does not validate")]
    InvalidSignature,
    #[error("Token has expired")]
    Expired,
    #[error("Token claims cannot be parsed")]
    Malformed,
    #[error("Wrong token kind for this operation")]
    WrongKind,
}

impl AuthError {
    /// Stable error code surfaced at the HTTP boundary.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidSignature => "InvalidSignature",
            AuthError::Expired => "Expired",
            AuthError::Malformed => "Malformed",
            AuthError::WrongKind => "WrongKind",
        }
    }
}

/// Which operations a token is good for. Only `Refresh` tokens may be
/// exchanged for a new access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject principal id.
    pub sub: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Access or refresh.
    pub kind: TokenKind,
}

/// Issues and verifies HS256-signed, time-limited tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_expiry_minutes),
            refresh_ttl: Duration::days(config.refresh_token_expiry_days),
            clock,
        }
    }

    /// Sign a token for `principal_id`. Pure apart from the clock read.
    pub fn issue(
        &self,
        principal_id: i64,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, anyhow::Error> {
        let now = self.clock.now();
        let claims = Claims {
            sub: principal_id,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    pub fn issue_access(&self, principal_id: i64) -> Result<String, anyhow::Error> {
        self.issue(principal_id, TokenKind::Access, self.access_ttl)
    }

    pub fn issue_refresh(&self, principal_id: i64) -> Result<String, anyhow::Error> {
        self.issue(principal_id, TokenKind::Refresh, self.refresh_ttl)
    }

    /// Issue an access + refresh pair for the same principal.
    pub fn issue_pair(&self, principal_id: i64) -> Result<(String, String), anyhow::Error> {
        Ok((self.issue_access(principal_id)?, self.issue_refresh(principal_id)?))
    }

    /// Verify signature, shape and expiry.
    ///
    /// The library's own exp validation is disabled; expiry is evaluated
    /// against the injected clock with a closed boundary: a token verified
    /// exactly at `exp` is already expired.
    pub fn verify(&self, raw: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(raw, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            }
        })?;

        if self.clock.now().timestamp() >= data.claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(data.claims)
    }

    /// Exchange a refresh token for a fresh access + refresh pair bound to
    /// the same principal (rotation). Rotation is stateless: the old
    /// refresh token is not invalidated and remains usable until its own
    /// expiry.
    pub fn refresh(&self, raw_refresh: &str) -> Result<(String, String), AuthError> {
        let claims = self.verify(raw_refresh)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::WrongKind);
        }
        self.issue_pair(claims.sub).map_err(|_| AuthError::Malformed)
    }

    /// Access token lifetime in seconds, for client display.
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }
}
