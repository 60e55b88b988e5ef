//! Ephemeral login-session store.
//!
//! Holds handshake sessions keyed by opaque session id. The state machine
//! is Pending → Completed or Pending → Expired; both end states are
//! terminal. Expiry is evaluated lazily on the read path, so no background
//! timer is needed.

use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use thiserror::Error;

use crate::models::{LoginSession, SessionStatus};

use super::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,
    #[error("Session is already completed or expired")]
    AlreadyTerminal,
}

/// Concurrent store of handshake sessions. The provider callback and the
/// polling client race on the same record; every mutation happens under
/// the map's per-entry lock, so the Pending→Completed transition is a
/// single compare-and-swap and at most one `complete` call wins.
pub struct SessionStore {
    sessions: DashMap<String, LoginSession>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(ttl_seconds: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_seconds),
            clock,
        }
    }

    /// Allocate a fresh pending session.
    pub fn create(&self) -> LoginSession {
        let session = LoginSession::new(self.clock.now(), self.ttl);
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        session
    }

    /// Read a session, coercing a lapsed Pending record to Expired first.
    /// The coercion runs under the entry lock, so a concurrent `complete`
    /// either observes Pending before the deadline or finds the record
    /// already terminal - never a half-applied state.
    pub fn get(&self, session_id: &str) -> Option<LoginSession> {
        let mut entry = self.sessions.get_mut(session_id)?;
        let now = self.clock.now();
        if entry.status == SessionStatus::Pending && entry.is_expired_at(now) {
            entry.status = SessionStatus::Expired;
        }
        Some(entry.clone())
    }

    /// The single write path besides `create`: bind the session to a
    /// principal and mark it Completed. Returns `AlreadyTerminal` to every
    /// caller after the first winner, covering duplicate callbacks and
    /// callbacks arriving after expiry.
    pub fn complete(&self, session_id: &str, principal_id: i64) -> Result<(), SessionError> {
        let mut entry = self
            .sessions
            .get_mut(session_id)
            .ok_or(SessionError::NotFound)?;

        if entry.status.is_terminal() {
            return Err(SessionError::AlreadyTerminal);
        }

        let now = self.clock.now();
        if entry.is_expired_at(now) {
            entry.status = SessionStatus::Expired;
            return Err(SessionError::AlreadyTerminal);
        }

        entry.status = SessionStatus::Completed;
        entry.bound_principal_id = Some(principal_id);
        Ok(())
    }
}
