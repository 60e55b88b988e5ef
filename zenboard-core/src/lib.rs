pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

// Re-export axum so service crates and shared middleware agree on versions.
pub use axum;
