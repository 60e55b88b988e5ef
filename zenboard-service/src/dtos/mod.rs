pub mod auth;
pub mod comment;
pub mod document;
pub mod project;
pub mod task;
pub mod user;
