pub mod authz;
pub mod bootstrap;
pub mod clock;
pub mod database;
pub mod error;
pub mod identity;
pub mod login;
pub mod provider;
pub mod session_store;
pub mod token;

pub use authz::AuthorizationEngine;
pub use bootstrap::promote_first_principal_to_admin;
pub use clock::{Clock, ManualClock, SystemClock};
pub use database::Database;
pub use error::ServiceError;
pub use identity::IdentityResolver;
pub use login::{LoginOrchestrator, LoginStatusView, OrchestrationError, StartedLogin};
pub use provider::{ExternalIdentity, IdentityProvider, ProviderError, WeChatProvider};
pub use session_store::{SessionError, SessionStore};
pub use token::{AuthError, Claims, TokenKind, TokenService};
