//! Profile table operations
//!
//! Profiles carry the subject's role and, for operators, their last
//! reported location. A subject without a profile row is a citizen.

use crate::models::Profile;
use chrono::Utc;
use cirs_common::{Result, Role};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Resolve a subject's role, defaulting to citizen when no profile exists
pub async fn get_role(pool: &SqlitePool, user_id: &str) -> Result<Role> {
    let row: Option<(String,)> = sqlx::query_as("SELECT role FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row
        .map(|(role,)| Role::from_db(&role))
        .unwrap_or(Role::Citizen))
}

/// Load a profile by subject id
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<Profile>> {
    let row = sqlx::query("SELECT * FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    row.map(|r| profile_from_row(&r)).transpose()
}

/// Create or replace a profile row
pub async fn upsert_profile(
    pool: &SqlitePool,
    user_id: &str,
    role: Role,
    display_name: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, role, display_name)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            role = excluded.role,
            display_name = excluded.display_name
        "#,
    )
    .bind(user_id)
    .bind(role.as_str())
    .bind(display_name)
    .execute(pool)
    .await?;

    Ok(())
}

/// Record an operator's current location
///
/// Returns None when no profile row exists for the subject.
pub async fn update_operator_location(
    pool: &SqlitePool,
    user_id: &str,
    lat: f64,
    lng: f64,
) -> Result<Option<Profile>> {
    let updated_at = Utc::now().to_rfc3339();

    let result = sqlx::query(
        "UPDATE profiles SET lat = ?, lng = ?, location_updated_at = ? WHERE user_id = ?",
    )
    .bind(lat)
    .bind(lng)
    .bind(&updated_at)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_profile(pool, user_id).await
}

fn profile_from_row(row: &SqliteRow) -> Result<Profile> {
    let location_updated_at: Option<String> = row.get("location_updated_at");
    let location_updated_at = location_updated_at
        .map(|s| {
            chrono::DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| {
                    cirs_common::Error::Internal(format!(
                        "Failed to parse location_updated_at: {}",
                        e
                    ))
                })
        })
        .transpose()?;

    Ok(Profile {
        user_id: row.get("user_id"),
        role: row.get("role"),
        display_name: row.get("display_name"),
        lat: row.get("lat"),
        lng: row.get("lng"),
        location_updated_at,
    })
}
