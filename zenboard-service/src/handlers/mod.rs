pub mod auth;
pub mod comments;
pub mod documents;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
