//! Login session model - one QR/OAuth handshake attempt.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handshake state. `Completed` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Completed,
    Expired,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Pending)
    }
}

/// One login-handshake attempt, keyed by an unguessable session id.
///
/// Invariant: `bound_principal_id` is `Some` iff `status == Completed`.
/// Records are owned exclusively by the session store; no other component
/// mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSession {
    pub session_id: String,
    pub status: SessionStatus,
    pub bound_principal_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LoginSession {
    /// Create a pending session. The uuid v4 id carries 122 bits of
    /// randomness, enough that collisions and guesses are negligible.
    pub fn new(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            status: SessionStatus::Pending,
            bound_principal_id: None,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
