//! HTTP API handlers for cirs-ir

pub mod auth;
pub mod health;
pub mod issues;
pub mod operators;

pub use auth::{auth_middleware, require_role, AuthContext};
pub use health::health_routes;
pub use issues::{create_issue, list_issues, update_issue};
pub use operators::update_location;
