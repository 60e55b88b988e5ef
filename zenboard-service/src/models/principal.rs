//! Principal model - an authenticated identity in the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// System-wide role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

/// Account review status.
///
/// External-login principals are created as `PendingReview` and flipped to
/// `Active` or `Rejected` by an admin approval action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    PendingReview,
    Active,
    Rejected,
}

/// Principal entity.
///
/// At most one principal exists per non-null `external_id`; the database
/// upserts on that key. Principals are never deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    /// Opaque id from the external login provider, unique when present.
    pub external_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// Create a principal from a first external-login sighting.
    pub fn from_external(external_id: String, name: Option<String>, avatar_url: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // assigned by the database on insert
            external_id: Some(external_id),
            email: None,
            name,
            avatar_url,
            role: Role::Member,
            status: AccountStatus::PendingReview,
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a principal from direct registration.
    pub fn from_registration(email: String, name: Option<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            external_id: None,
            email: Some(email),
            name,
            avatar_url: None,
            role: Role::Member,
            status: AccountStatus::PendingReview,
            password_hash: Some(password_hash),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// API view without credential material.
    pub fn sanitized(&self) -> SanitizedPrincipal {
        SanitizedPrincipal {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
            role: self.role,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Principal response for the API (no hash, no external id).
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPrincipal {
    pub id: i64,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
