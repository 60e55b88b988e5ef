//! Identity resolution - external provider identity to local principal.

use crate::models::Principal;

use super::database::Database;
use super::provider::ExternalIdentity;

/// Maps an external-provider identity to a local principal, creating one
/// on first sight. New principals enter as unreviewed members; an admin
/// approval action activates them later.
#[derive(Clone)]
pub struct IdentityResolver {
    db: Database,
}

impl IdentityResolver {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn resolve_or_create(&self, identity: &ExternalIdentity) -> Principal {
        self.db
            .find_or_create_principal_by_external_id(&identity.external_id, || {
                tracing::info!(external_id = %identity.external_id, "Creating principal for first external login");
                Principal::from_external(
                    identity.external_id.clone(),
                    identity.name.clone(),
                    identity.avatar_url.clone(),
                )
            })
            .await
    }
}
