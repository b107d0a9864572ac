//! Database module for SQLite persistence.
//!
//! SQLite is the authoritative profile store. Terms are not stored here; they
//! are read from the content file on startup.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            username TEXT PRIMARY KEY,
            id INTEGER NOT NULL,
            email TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'contributor',
            github TEXT,
            linkedin TEXT,
            thumbnail TEXT NOT NULL DEFAULT '',
            intro TEXT NOT NULL DEFAULT '',
            show_email INTEGER NOT NULL DEFAULT 0,
            show_github INTEGER NOT NULL DEFAULT 0,
            show_linkedin INTEGER NOT NULL DEFAULT 0,
            rank_current INTEGER NOT NULL DEFAULT 0,
            rank_posts_count INTEGER NOT NULL DEFAULT 0,
            rank_remaining INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_profiles_name ON profiles(name);")
        .execute(pool)
        .await?;

    Ok(())
}
