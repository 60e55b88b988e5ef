//! Startup bootstrap operations.

use crate::models::Role;

use super::database::Database;

/// Promote the first registered principal to system admin.
///
/// Runs once at startup. Earlier revisions of the product applied this as
/// a side effect inside a user-listing read path; here it is an explicit,
/// separately tested operation. No-op when there are no principals or an
/// admin already exists.
pub async fn promote_first_principal_to_admin(db: &Database) -> Option<i64> {
    let has_admin = db
        .list_principals(None)
        .await
        .iter()
        .any(|p| p.role == Role::Admin);
    if has_admin {
        return None;
    }

    let first = db.first_principal().await?;
    db.update_principal_role(first.id, Role::Admin).await;
    tracing::info!(principal_id = first.id, "Promoted first principal to admin");
    Some(first.id)
}
