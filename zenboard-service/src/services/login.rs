//! Login orchestration - the full QR/OAuth handshake.
//!
//! Composes the session store, the external provider client, identity
//! resolution and token issuance. The anonymous browser never holds a
//! long-lived secret before the handshake completes: tokens are minted
//! lazily on the first successful poll after completion and are never
//! stored in the session record.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::models::{LoginSession, SessionStatus};

use super::identity::IdentityResolver;
use super::provider::{IdentityProvider, ProviderError};
use super::session_store::{SessionError, SessionStore};
use super::token::TokenService;

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Upstream(#[from] ProviderError),
    #[error("Identity resolution failed: {0}")]
    Identity(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Descriptor returned to the browser starting a handshake.
#[derive(Debug, Clone, Serialize)]
pub struct StartedLogin {
    pub session_id: String,
    pub presentation_url: String,
    pub expires_in_seconds: i64,
}

/// Poll result. Tokens appear only in the completed arm.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoginStatusView {
    Pending,
    Expired,
    Completed {
        access_token: String,
        refresh_token: String,
    },
}

pub struct LoginOrchestrator {
    sessions: Arc<SessionStore>,
    provider: Arc<dyn IdentityProvider>,
    resolver: IdentityResolver,
    tokens: TokenService,
}

impl LoginOrchestrator {
    pub fn new(
        sessions: Arc<SessionStore>,
        provider: Arc<dyn IdentityProvider>,
        resolver: IdentityResolver,
        tokens: TokenService,
    ) -> Self {
        Self {
            sessions,
            provider,
            resolver,
            tokens,
        }
    }

    /// Open a handshake and hand the browser the URL to render as a QR
    /// code, with the session id embedded as the opaque `state` token.
    pub fn start_login(&self) -> StartedLogin {
        let session: LoginSession = self.sessions.create();
        let presentation_url = self.provider.authorize_url(&session.session_id);
        let expires_in_seconds = (session.expires_at - session.created_at).num_seconds();
        tracing::debug!(session_id = %session.session_id, "Login session started");
        StartedLogin {
            session_id: session.session_id,
            presentation_url,
            expires_in_seconds,
        }
    }

    /// Provider callback: exchange the proof upstream, resolve the
    /// principal, complete the session. Upstream failures are propagated
    /// without retry; the client restarts the handshake.
    pub async fn handle_provider_callback(
        &self,
        proof: &str,
        session_id: &str,
    ) -> Result<(), OrchestrationError> {
        let identity = self.provider.exchange(proof).await?;
        if identity.external_id.is_empty() {
            return Err(OrchestrationError::Identity(
                "Provider returned an empty external id".to_string(),
            ));
        }

        let principal = self.resolver.resolve_or_create(&identity).await;

        // Linearization point: the first completion wins; duplicates and
        // post-expiry callbacks surface AlreadyTerminal.
        self.sessions.complete(session_id, principal.id)?;
        tracing::info!(
            session_id = %session_id,
            principal_id = principal.id,
            "Login session completed"
        );
        Ok(())
    }

    /// Status for the polling client. Reads observe lazy expiry; a poll
    /// that sees Completed is guaranteed the bound principal was already
    /// durably resolved before the completion was published.
    pub fn poll_status(&self, session_id: &str) -> Result<LoginStatusView, OrchestrationError> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or(SessionError::NotFound)?;

        match session.status {
            SessionStatus::Pending => Ok(LoginStatusView::Pending),
            SessionStatus::Expired => Ok(LoginStatusView::Expired),
            SessionStatus::Completed => {
                // Invariant: bound_principal_id is Some iff Completed.
                let principal_id = session.bound_principal_id.ok_or_else(|| {
                    anyhow::anyhow!("Completed session without a bound principal")
                })?;
                let (access_token, refresh_token) = self.tokens.issue_pair(principal_id)?;
                Ok(LoginStatusView::Completed {
                    access_token,
                    refresh_token,
                })
            }
        }
    }
}
