//! Bearer-token authentication middleware
//!
//! Verifies the token against the identity provider, resolves the
//! subject's role from the profiles table, and attaches the resulting
//! [`AuthContext`] to the request. Role enforcement happens per handler;
//! the middleware only establishes who is calling.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use cirs_common::{Role, Subject};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::services::AuthError;
use crate::AppState;

/// Authenticated caller: subject identity plus resolved role
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject: Subject,
    pub role: Role,
}

/// Authentication middleware for protected routes
///
/// Returns 401 for a missing, malformed, or rejected token. Role checks
/// (403) are the handlers' responsibility via [`require_role`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let subject = state.verifier.verify(token).await.map_err(|e| match e {
        AuthError::Rejected => {
            warn!("Bearer token rejected by identity provider");
            ApiError::Unauthorized("Invalid token".to_string())
        }
        AuthError::Provider(reason) => {
            // Provider outage is not a rejection; surface as a server error
            ApiError::Internal(format!("Identity provider unavailable: {}", reason))
        }
    })?;

    let role = crate::db::profiles::get_role(&state.db, &subject.id.to_string()).await?;

    debug!(subject_id = %subject.id, role = %role, "Request authenticated");

    request.extensions_mut().insert(AuthContext { subject, role });

    Ok(next.run(request).await)
}

/// Check the caller holds the required role
pub fn require_role(ctx: &AuthContext, required: Role) -> Result<(), ApiError> {
    if ctx.role == required {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!("{} role required", required)))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
