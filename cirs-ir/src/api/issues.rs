//! Issue API handlers
//!
//! POST /api/issue, GET /api/issues, PUT /api/issue/{id}

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use cirs_common::Role;
use serde::Deserialize;
use tracing::info;

use crate::api::auth::{require_role, AuthContext};
use crate::db::issues::{IssueUpdate, NewIssue};
use crate::error::ApiResult;
use crate::models::{Issue, MediaKind, Submission};
use crate::AppState;

/// POST /api/issue request
#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    #[serde(default)]
    pub description_text: String,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// PUT /api/issue/{id} request (partial)
#[derive(Debug, Deserialize)]
pub struct UpdateIssueRequest {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

/// POST /api/issue
///
/// Any authenticated subject may report an issue. The categorization
/// pipeline always resolves a category; a failed classification never
/// rejects the report.
pub async fn create_issue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateIssueRequest>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    let submission = Submission {
        description_text: request.description_text,
        media_url: request.media_url,
        media_kind: MediaKind::parse(request.media_type.as_deref()),
    };

    let outcome = state.orchestrator.categorize_submission(&submission).await;

    info!(
        subject_id = %auth.subject.id,
        category = %outcome.category,
        media_kind = ?submission.media_kind,
        "Submission categorized"
    );

    let new_issue = NewIssue {
        description_text: outcome.final_description,
        lat: request.lat,
        lng: request.lng,
        media_url: submission.media_url,
        media_type: request.media_type,
        category: outcome.category,
        submitted_by: Some(auth.subject.id.to_string()),
    };

    let issue = crate::db::issues::insert_issue(&state.db, &new_issue).await?;

    Ok((StatusCode::CREATED, Json(issue)))
}

/// GET /api/issues
///
/// Admin-only listing, newest first. The role check precedes any
/// storage read.
pub async fn list_issues(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Issue>>> {
    require_role(&auth, Role::Admin)?;

    let issues = crate::db::issues::list_issues(&state.db).await?;

    Ok(Json(issues))
}

/// PUT /api/issue/{id}
///
/// Admin-only partial update of status and/or assignment. A body with no
/// recognized field is a 400 and performs no storage mutation.
pub async fn update_issue(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateIssueRequest>,
) -> ApiResult<Json<Issue>> {
    require_role(&auth, Role::Admin)?;

    let update = IssueUpdate {
        status: request.status,
        assigned_to: request.assigned_to,
    };

    let issue = crate::db::issues::update_issue(&state.db, id, &update).await?;

    info!(issue_id = id, status = %issue.status, "Issue updated");

    Ok(Json(issue))
}
