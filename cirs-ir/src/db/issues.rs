//! Issue table operations
//!
//! Issues are created exactly once at intake and mutated only through
//! partial updates of `status` and `assigned_to`. Nothing deletes them.

use crate::models::{Issue, STATUS_PENDING};
use chrono::Utc;
use cirs_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Fields for a new issue record; id and created_at are storage-assigned
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub description_text: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub category: String,
    pub submitted_by: Option<String>,
}

/// Partial update of an issue; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

impl IssueUpdate {
    /// True when no recognized field is present
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_to.is_none()
    }
}

/// Insert a new issue and return the stored record
///
/// Every new issue starts in `Pending` status regardless of input.
pub async fn insert_issue(pool: &SqlitePool, new_issue: &NewIssue) -> Result<Issue> {
    let created_at = Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        INSERT INTO issues (
            created_at, description_text, lat, lng,
            media_url, media_type, status, category, submitted_by
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&created_at)
    .bind(&new_issue.description_text)
    .bind(new_issue.lat)
    .bind(new_issue.lng)
    .bind(&new_issue.media_url)
    .bind(&new_issue.media_type)
    .bind(STATUS_PENDING)
    .bind(&new_issue.category)
    .bind(&new_issue.submitted_by)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();

    get_issue(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Issue {} missing after insert", id)))
}

/// Load a single issue by id
pub async fn get_issue(pool: &SqlitePool, id: i64) -> Result<Option<Issue>> {
    let row = sqlx::query("SELECT * FROM issues WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| issue_from_row(&r)).transpose()
}

/// List all issues, newest first
pub async fn list_issues(pool: &SqlitePool) -> Result<Vec<Issue>> {
    let rows = sqlx::query("SELECT * FROM issues ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;

    rows.iter().map(issue_from_row).collect()
}

/// Apply a partial update and return the updated record
///
/// An empty update is invalid input; a missing row surfaces as NotFound
/// for the handler to treat as a storage failure.
pub async fn update_issue(pool: &SqlitePool, id: i64, update: &IssueUpdate) -> Result<Issue> {
    if update.is_empty() {
        return Err(Error::InvalidInput(
            "No recognized fields to update".to_string(),
        ));
    }

    let mut set_clauses: Vec<&str> = Vec::new();
    if update.status.is_some() {
        set_clauses.push("status = ?");
    }
    if update.assigned_to.is_some() {
        set_clauses.push("assigned_to = ?");
    }

    let sql = format!("UPDATE issues SET {} WHERE id = ?", set_clauses.join(", "));

    let mut query = sqlx::query(&sql);
    if let Some(status) = &update.status {
        query = query.bind(status);
    }
    if let Some(assigned_to) = &update.assigned_to {
        query = query.bind(assigned_to);
    }

    let result = query.bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("issue {}", id)));
    }

    get_issue(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("issue {}", id)))
}

fn issue_from_row(row: &SqliteRow) -> Result<Issue> {
    let created_at: String = row.get("created_at");
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&chrono::Utc);

    Ok(Issue {
        id: row.get("id"),
        created_at,
        description_text: row.get("description_text"),
        lat: row.get("lat"),
        lng: row.get("lng"),
        media_url: row.get("media_url"),
        media_type: row.get("media_type"),
        status: row.get("status"),
        category: row.get("category"),
        assigned_to: row.get("assigned_to"),
        submitted_by: row.get("submitted_by"),
    })
}
