//! cirs-ir library interface
//!
//! Exposes the application state and router builder for the binary and
//! for integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{CategorizationOrchestrator, TokenVerifier};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Identity provider token verifier
    pub verifier: Arc<dyn TokenVerifier>,
    /// Intake categorization pipeline
    pub orchestrator: Arc<CategorizationOrchestrator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        verifier: Arc<dyn TokenVerifier>,
        orchestrator: Arc<CategorizationOrchestrator>,
    ) -> Self {
        Self {
            db,
            verifier,
            orchestrator,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Protected routes require a verified bearer token; role checks happen
/// per handler. Liveness and health stay public. CORS is permissive: the
/// reporting front ends are served from arbitrary origins.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};

    let protected = Router::new()
        .route("/api/issue", post(api::create_issue))
        .route("/api/issues", get(api::list_issues))
        .route("/api/issue/:id", put(api::update_issue))
        .route("/api/operator/location", post(api::update_location))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = api::health_routes();

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
