//! Authorization engine - resource visibility decisions.
//!
//! The decision function is pure and total: every (principal, resource,
//! action) triple maps to exactly one boolean. "Resource not found" is the
//! caller's NotFound check, performed before this function runs.

use crate::models::{Action, Principal, ProjectMembership, ResourceAcl, Visibility};

use super::database::Database;

/// Pure decision ladder, first true wins:
/// 1. system admins bypass visibility entirely;
/// 2. owners may do anything with their own resource;
/// 3. grantees (listed users plus assignees folded in by the resource's
///    `acl()`) may read on any visibility arm: assignment implies
///    visibility;
/// 4. Public grants read to everyone, never write;
/// 5. ProjectScoped grants read to members, write to project owners/admins;
/// 6. otherwise deny.
pub fn evaluate(
    principal: &Principal,
    acl: &ResourceAcl,
    action: Action,
    membership: Option<&ProjectMembership>,
) -> bool {
    if principal.is_admin() {
        return true;
    }
    if acl.owner_id == principal.id {
        return true;
    }
    if action == Action::Read && acl.grants(principal.id) {
        return true;
    }

    match acl.visibility {
        Visibility::Public => action == Action::Read,
        Visibility::SpecificUsers => false,
        Visibility::ProjectScoped => match membership {
            Some(m) if Some(m.project_id) == acl.project_id => {
                action == Action::Read || m.role.can_write()
            }
            _ => false,
        },
        Visibility::Private => false,
    }
}

/// Evaluates visibility decisions, fetching the principal's membership for
/// the resource's project when the rule needs one.
#[derive(Clone)]
pub struct AuthorizationEngine {
    db: Database,
}

impl AuthorizationEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn check(&self, principal: &Principal, acl: &ResourceAcl, action: Action) -> bool {
        let membership = match acl.project_id {
            Some(project_id) => self.db.find_membership(project_id, principal.id).await,
            None => None,
        };
        evaluate(principal, acl, action, membership.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Principal, ProjectRole, Role};

    fn principal(id: i64, role: Role) -> Principal {
        let mut p = Principal::from_external(format!("ext-{}", id), None, None);
        p.id = id;
        p.role = role;
        p
    }

    fn acl(owner: i64, visibility: Visibility) -> ResourceAcl {
        ResourceAcl {
            owner_id: owner,
            visibility,
            project_id: None,
            grantees: Vec::new(),
        }
    }

    #[test]
    fn owner_writes_regardless_of_visibility() {
        let owner = principal(5, Role::Member);
        for visibility in [
            Visibility::Private,
            Visibility::ProjectScoped,
            Visibility::SpecificUsers,
            Visibility::Public,
        ] {
            let acl = acl(5, visibility);
            assert!(evaluate(&owner, &acl, Action::Write, None));
        }
    }

    #[test]
    fn admin_bypasses_visibility() {
        let admin = principal(1, Role::Admin);
        let acl = acl(99, Visibility::Private);
        assert!(evaluate(&admin, &acl, Action::Read, None));
        assert!(evaluate(&admin, &acl, Action::Write, None));
    }

    #[test]
    fn private_denies_non_owner() {
        let stranger = principal(2, Role::Member);
        let acl = acl(1, Visibility::Private);
        assert!(!evaluate(&stranger, &acl, Action::Read, None));
        assert!(!evaluate(&stranger, &acl, Action::Write, None));
    }

    #[test]
    fn public_grants_read_but_not_write() {
        let stranger = principal(2, Role::Member);
        let acl = acl(1, Visibility::Public);
        assert!(evaluate(&stranger, &acl, Action::Read, None));
        assert!(!evaluate(&stranger, &acl, Action::Write, None));
    }

    #[test]
    fn specific_users_grants_read_to_listed_principals() {
        let grantee = principal(2, Role::Member);
        let other = principal(3, Role::Member);
        let mut acl = acl(1, Visibility::SpecificUsers);
        acl.grantees = vec![2];

        assert!(evaluate(&grantee, &acl, Action::Read, None));
        assert!(!evaluate(&grantee, &acl, Action::Write, None));
        assert!(!evaluate(&other, &acl, Action::Read, None));
    }

    #[test]
    fn grantees_read_on_every_visibility_arm() {
        // Assignees land in the grantee set, so a private task must still
        // be readable (never writable) by its assignee.
        let assignee = principal(2, Role::Member);
        for visibility in [
            Visibility::Private,
            Visibility::ProjectScoped,
            Visibility::SpecificUsers,
        ] {
            let mut acl = acl(1, visibility);
            acl.grantees = vec![2];
            assert!(evaluate(&assignee, &acl, Action::Read, None));
            assert!(!evaluate(&assignee, &acl, Action::Write, None));
        }
    }

    #[test]
    fn specific_users_with_empty_grantees_means_owner_only() {
        let stranger = principal(2, Role::Member);
        let acl = acl(1, Visibility::SpecificUsers);
        assert!(!evaluate(&stranger, &acl, Action::Read, None));
    }

    #[test]
    fn project_scoped_requires_membership() {
        let member = principal(2, Role::Member);
        let mut acl = acl(1, Visibility::ProjectScoped);
        acl.project_id = Some(10);

        assert!(!evaluate(&member, &acl, Action::Read, None));

        let membership = ProjectMembership::new(10, 2, ProjectRole::Member);
        assert!(evaluate(&member, &acl, Action::Read, Some(&membership)));
        assert!(!evaluate(&member, &acl, Action::Write, Some(&membership)));
    }

    #[test]
    fn project_write_requires_owner_or_admin_role() {
        let member = principal(2, Role::Member);
        let mut acl = acl(1, Visibility::ProjectScoped);
        acl.project_id = Some(10);

        for (role, allowed) in [
            (ProjectRole::Owner, true),
            (ProjectRole::Admin, true),
            (ProjectRole::Member, false),
        ] {
            let membership = ProjectMembership::new(10, 2, role);
            assert_eq!(
                evaluate(&member, &acl, Action::Write, Some(&membership)),
                allowed
            );
        }
    }

    #[test]
    fn membership_for_wrong_project_does_not_count() {
        let member = principal(2, Role::Member);
        let mut acl = acl(1, Visibility::ProjectScoped);
        acl.project_id = Some(10);

        let foreign = ProjectMembership::new(11, 2, ProjectRole::Owner);
        assert!(!evaluate(&member, &acl, Action::Read, Some(&foreign)));
    }

    #[tokio::test]
    async fn check_fetches_membership_from_repository() {
        let db = Database::new();
        db.upsert_membership(ProjectMembership::new(10, 2, ProjectRole::Admin))
            .await;
        let engine = AuthorizationEngine::new(db);

        let member = principal(2, Role::Member);
        let mut acl = acl(1, Visibility::ProjectScoped);
        acl.project_id = Some(10);

        assert!(engine.check(&member, &acl, Action::Write).await);
    }
}
