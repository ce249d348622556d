//! Operator API handlers
//!
//! POST /api/operator/location

use axum::{
    extract::{Extension, State},
    Json,
};
use cirs_common::Role;
use serde::Deserialize;
use tracing::info;

use crate::api::auth::{require_role, AuthContext};
use crate::error::{ApiError, ApiResult};
use crate::models::Profile;
use crate::AppState;

/// POST /api/operator/location request
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub lat: f64,
    pub lng: f64,
}

/// POST /api/operator/location
///
/// Operators report their current position so dispatch can route nearby
/// issues. 404 when the operator's profile row is gone.
pub async fn update_location(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<UpdateLocationRequest>,
) -> ApiResult<Json<Profile>> {
    require_role(&auth, Role::Operator)?;

    let user_id = auth.subject.id.to_string();

    let profile = crate::db::profiles::update_operator_location(
        &state.db,
        &user_id,
        request.lat,
        request.lng,
    )
    .await?;

    match profile {
        Some(profile) => {
            info!(subject_id = %auth.subject.id, "Operator location updated");
            Ok(Json(profile))
        }
        None => Err(ApiError::NotFound("Operator profile not found".to_string())),
    }
}
