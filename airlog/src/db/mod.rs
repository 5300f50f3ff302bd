//! Database access layer for airlog
//!
//! One SQLite file holds the song log and the discrepancy log. Schema
//! creation is idempotent and runs at every startup.

use airlog_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

pub mod discrepancies;
pub mod songs;

/// Open (or create) the database and apply the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL keeps readers unblocked while a write request commits
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    apply_schema(&pool).await?;

    Ok(pool)
}

/// Create tables if needed (idempotent, safe to call multiple times)
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    create_djlog_table(pool).await?;
    create_discrepancy_log_table(pool).await?;
    Ok(())
}

async fn create_djlog_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS djlog (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            asset_id TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            truncated_artist TEXT NOT NULL,
            album TEXT NOT NULL DEFAULT '',
            genre TEXT NOT NULL DEFAULT '',
            location TEXT NOT NULL,
            played_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Window queries filter on played_at
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_djlog_played_at ON djlog (played_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_discrepancy_log_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS discrepancy_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            show_host TEXT NOT NULL,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            trigger_word TEXT NOT NULL,
            suppressed INTEGER NOT NULL,
            occurred_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// In-memory database with schema applied, for tests
///
/// Pinned to a single never-recycled connection: every pooled connection to
/// `sqlite::memory:` would otherwise get its own empty database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    apply_schema(&pool).await?;
    Ok(pool)
}
