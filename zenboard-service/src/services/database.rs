//! Repository facade.
//!
//! Single struct exposing the async lookup/mutation methods the handlers
//! and the authorization engine call. Backed by in-process maps; durable
//! persistence is an external collaborator concern, and a database-backed
//! implementation would replace only this file - every caller goes through
//! these methods, never through the maps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use crate::models::{
    AccountStatus, Comment, CommentParent, Document, Principal, Project, ProjectMembership,
    ProjectRole, Role, Task,
};

struct Inner {
    principals: DashMap<i64, Principal>,
    // external id -> principal id; writes go through the entry lock so at
    // most one principal ever exists per external id.
    external_index: DashMap<String, i64>,
    projects: DashMap<i64, Project>,
    memberships: DashMap<(i64, i64), ProjectMembership>,
    tasks: DashMap<i64, Task>,
    documents: DashMap<i64, Document>,
    comments: DashMap<i64, Comment>,
    next_principal_id: AtomicI64,
    next_project_id: AtomicI64,
    next_task_id: AtomicI64,
    next_document_id: AtomicI64,
    next_comment_id: AtomicI64,
}

#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                principals: DashMap::new(),
                external_index: DashMap::new(),
                projects: DashMap::new(),
                memberships: DashMap::new(),
                tasks: DashMap::new(),
                documents: DashMap::new(),
                comments: DashMap::new(),
                next_principal_id: AtomicI64::new(1),
                next_project_id: AtomicI64::new(1),
                next_task_id: AtomicI64::new(1),
                next_document_id: AtomicI64::new(1),
                next_comment_id: AtomicI64::new(1),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Principals
    // ------------------------------------------------------------------

    pub async fn insert_principal(&self, mut principal: Principal) -> Principal {
        let id = self.inner.next_principal_id.fetch_add(1, Ordering::SeqCst);
        principal.id = id;
        if let Some(external_id) = principal.external_id.clone() {
            self.inner.external_index.insert(external_id, id);
        }
        self.inner.principals.insert(id, principal.clone());
        principal
    }

    /// Look up by external id, creating on first sight. The creation runs
    /// under the index entry lock, so concurrent callbacks for the same
    /// external id converge on one principal.
    pub async fn find_or_create_principal_by_external_id(
        &self,
        external_id: &str,
        make: impl FnOnce() -> Principal,
    ) -> Principal {
        let id = *self
            .inner
            .external_index
            .entry(external_id.to_string())
            .or_insert_with(|| {
                let id = self.inner.next_principal_id.fetch_add(1, Ordering::SeqCst);
                let mut principal = make();
                principal.id = id;
                principal.external_id = Some(external_id.to_string());
                self.inner.principals.insert(id, principal);
                id
            });
        self.inner
            .principals
            .get(&id)
            .map(|p| p.clone())
            .expect("indexed principal must exist")
    }

    pub async fn find_principal_by_id(&self, id: i64) -> Option<Principal> {
        self.inner.principals.get(&id).map(|p| p.clone())
    }

    pub async fn find_principal_by_email(&self, email: &str) -> Option<Principal> {
        self.inner
            .principals
            .iter()
            .find(|p| p.email.as_deref() == Some(email))
            .map(|p| p.clone())
    }

    pub async fn list_principals(&self, status: Option<AccountStatus>) -> Vec<Principal> {
        let mut principals: Vec<Principal> = self
            .inner
            .principals
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .map(|p| p.clone())
            .collect();
        principals.sort_by_key(|p| p.id);
        principals
    }

    pub async fn count_principals(&self) -> usize {
        self.inner.principals.len()
    }

    /// First principal by id, used by the bootstrap promotion.
    pub async fn first_principal(&self) -> Option<Principal> {
        self.inner
            .principals
            .iter()
            .map(|p| p.clone())
            .min_by_key(|p| p.id)
    }

    pub async fn update_principal_status(
        &self,
        id: i64,
        status: AccountStatus,
    ) -> Option<Principal> {
        let mut entry = self.inner.principals.get_mut(&id)?;
        entry.status = status;
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }

    pub async fn update_principal_role(&self, id: i64, role: Role) -> Option<Principal> {
        let mut entry = self.inner.principals.get_mut(&id)?;
        entry.role = role;
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }

    pub async fn update_principal_profile(
        &self,
        id: i64,
        name: Option<String>,
        email: Option<String>,
        avatar_url: Option<String>,
    ) -> Option<Principal> {
        let mut entry = self.inner.principals.get_mut(&id)?;
        if let Some(name) = name {
            entry.name = Some(name);
        }
        if let Some(email) = email {
            entry.email = Some(email);
        }
        if let Some(avatar_url) = avatar_url {
            entry.avatar_url = Some(avatar_url);
        }
        entry.updated_at = Utc::now();
        Some(entry.clone())
    }

    // ------------------------------------------------------------------
    // Projects and memberships
    // ------------------------------------------------------------------

    pub async fn insert_project(&self, mut project: Project) -> Project {
        let id = self.inner.next_project_id.fetch_add(1, Ordering::SeqCst);
        project.id = id;
        self.inner.projects.insert(id, project.clone());
        project
    }

    pub async fn find_project_by_id(&self, id: i64) -> Option<Project> {
        self.inner.projects.get(&id).map(|p| p.clone())
    }

    pub async fn list_projects(&self) -> Vec<Project> {
        let mut projects: Vec<Project> =
            self.inner.projects.iter().map(|p| p.clone()).collect();
        projects.sort_by_key(|p| p.id);
        projects
    }

    pub async fn update_project(&self, project: Project) -> Option<Project> {
        let mut entry = self.inner.projects.get_mut(&project.id)?;
        *entry = Project {
            updated_at: Utc::now(),
            ..project
        };
        Some(entry.clone())
    }

    /// Insert or replace; the (project, principal) pair is the key.
    pub async fn upsert_membership(&self, membership: ProjectMembership) -> ProjectMembership {
        self.inner.memberships.insert(
            (membership.project_id, membership.principal_id),
            membership.clone(),
        );
        membership
    }

    pub async fn find_membership(
        &self,
        project_id: i64,
        principal_id: i64,
    ) -> Option<ProjectMembership> {
        self.inner
            .memberships
            .get(&(project_id, principal_id))
            .map(|m| m.clone())
    }

    pub async fn remove_membership(&self, project_id: i64, principal_id: i64) -> bool {
        self.inner
            .memberships
            .remove(&(project_id, principal_id))
            .is_some()
    }

    pub async fn list_project_members(&self, project_id: i64) -> Vec<ProjectMembership> {
        let mut members: Vec<ProjectMembership> = self
            .inner
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .map(|m| m.clone())
            .collect();
        members.sort_by_key(|m| m.principal_id);
        members
    }

    pub async fn membership_role(
        &self,
        project_id: i64,
        principal_id: i64,
    ) -> Option<ProjectRole> {
        self.find_membership(project_id, principal_id)
            .await
            .map(|m| m.role)
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn insert_task(&self, mut task: Task) -> Task {
        let id = self.inner.next_task_id.fetch_add(1, Ordering::SeqCst);
        task.id = id;
        self.inner.tasks.insert(id, task.clone());
        task
    }

    pub async fn find_task_by_id(&self, id: i64) -> Option<Task> {
        self.inner.tasks.get(&id).map(|t| t.clone())
    }

    pub async fn update_task(&self, task: Task) -> Option<Task> {
        let mut entry = self.inner.tasks.get_mut(&task.id)?;
        *entry = Task {
            updated_at: Utc::now(),
            ..task
        };
        Some(entry.clone())
    }

    pub async fn delete_task(&self, id: i64) -> bool {
        self.inner.tasks.remove(&id).is_some()
    }

    pub async fn list_tasks(&self, project_id: Option<i64>) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .inner
            .tasks
            .iter()
            .filter(|t| project_id.map_or(true, |p| t.project_id == Some(p)))
            .map(|t| t.clone())
            .collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    pub async fn insert_document(&self, mut document: Document) -> Document {
        let id = self.inner.next_document_id.fetch_add(1, Ordering::SeqCst);
        document.id = id;
        self.inner.documents.insert(id, document.clone());
        document
    }

    pub async fn find_document_by_id(&self, id: i64) -> Option<Document> {
        self.inner.documents.get(&id).map(|d| d.clone())
    }

    pub async fn update_document(&self, document: Document) -> Option<Document> {
        let mut entry = self.inner.documents.get_mut(&document.id)?;
        *entry = Document {
            updated_at: Utc::now(),
            ..document
        };
        Some(entry.clone())
    }

    pub async fn delete_document(&self, id: i64) -> bool {
        // Comments hang off the document by id; drop them with it.
        self.inner
            .comments
            .retain(|_, c| c.parent != CommentParent::Document(id));
        self.inner.documents.remove(&id).is_some()
    }

    pub async fn list_documents(&self, project_id: Option<i64>, author_id: Option<i64>) -> Vec<Document> {
        let mut documents: Vec<Document> = self
            .inner
            .documents
            .iter()
            .filter(|d| project_id.map_or(true, |p| d.project_id == Some(p)))
            .filter(|d| author_id.map_or(true, |a| d.author_id == a))
            .map(|d| d.clone())
            .collect();
        documents.sort_by_key(|d| d.id);
        documents
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub async fn insert_comment(&self, mut comment: Comment) -> Comment {
        let id = self.inner.next_comment_id.fetch_add(1, Ordering::SeqCst);
        comment.id = id;
        self.inner.comments.insert(id, comment.clone());
        comment
    }

    pub async fn find_comment_by_id(&self, id: i64) -> Option<Comment> {
        self.inner.comments.get(&id).map(|c| c.clone())
    }

    pub async fn delete_comment(&self, id: i64) -> bool {
        self.inner.comments.remove(&id).is_some()
    }

    pub async fn list_comments(&self, parent: CommentParent) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .inner
            .comments
            .iter()
            .filter(|c| c.parent == parent)
            .map(|c| c.clone())
            .collect();
        comments.sort_by_key(|c| c.id);
        comments
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Principal;

    #[tokio::test]
    async fn external_id_maps_to_a_single_principal() {
        let db = Database::new();
        let a = db
            .find_or_create_principal_by_external_id("ext-1", || {
                Principal::from_external("ext-1".to_string(), None, None)
            })
            .await;
        let b = db
            .find_or_create_principal_by_external_id("ext-1", || {
                Principal::from_external("ext-1".to_string(), None, None)
            })
            .await;
        assert_eq!(a.id, b.id);
        assert_eq!(db.count_principals().await, 1);
    }

    #[tokio::test]
    async fn membership_is_unique_per_pair() {
        let db = Database::new();
        db.upsert_membership(ProjectMembership::new(1, 2, ProjectRole::Member))
            .await;
        db.upsert_membership(ProjectMembership::new(1, 2, ProjectRole::Admin))
            .await;
        assert_eq!(db.list_project_members(1).await.len(), 1);
        assert_eq!(db.membership_role(1, 2).await, Some(ProjectRole::Admin));
    }
}
