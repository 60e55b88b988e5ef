pub mod comment;
pub mod document;
pub mod login_session;
pub mod membership;
pub mod principal;
pub mod project;
pub mod task;
pub mod visibility;

pub use comment::{Comment, CommentParent};
pub use document::Document;
pub use login_session::{LoginSession, SessionStatus};
pub use membership::{ProjectMembership, ProjectRole};
pub use principal::{AccountStatus, Principal, Role};
pub use project::{Project, ProjectStatus};
pub use task::{Subtask, Task, TaskPriority};
pub use visibility::{Action, ResourceAcl, Visibility};
