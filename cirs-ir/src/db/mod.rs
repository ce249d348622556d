//! Database access for cirs-ir
//!
//! The record store is deliberately thin: issues and profiles live in two
//! tables, and the service only ever inserts, partially updates, and
//! selects by filter.

pub mod issues;
pub mod profiles;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to cirs.db in the service root folder, creating it if needed.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Initialize cirs-ir tables
///
/// Creates issues and profiles tables if they don't exist. Public so
/// integration tests can run against an in-memory pool.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS issues (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            description_text TEXT NOT NULL DEFAULT '',
            lat REAL,
            lng REAL,
            media_url TEXT,
            media_type TEXT,
            status TEXT NOT NULL,
            category TEXT NOT NULL,
            assigned_to TEXT,
            submitted_by TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            user_id TEXT PRIMARY KEY,
            role TEXT NOT NULL DEFAULT 'citizen',
            display_name TEXT,
            lat REAL,
            lng REAL,
            location_updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (issues, profiles)");

    Ok(())
}
