pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// How long a writer waits on a locked database before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open (or create) the vault database at the given path, with schema
/// initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    conn.busy_timeout(BUSY_TIMEOUT)?;
    // WAL lets readers keep a consistent snapshot while a submission commits
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open a fully migrated in-memory database (tests and dry runs).
pub fn open_memory_database() -> Result<Connection> {
    let mut conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&mut conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Result of [`check_database_health`].
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub integrity_ok: bool,
    /// Raw `integrity_check` output (`"ok"` when healthy).
    pub integrity_details: String,
    pub schema_version: u32,
    pub score_version: Option<String>,
    pub strategy_count: u64,
}

/// Run `PRAGMA integrity_check` and collect version and row-count facts.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let integrity: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .context("integrity check failed to run")?;

    let schema_version = migrations::get_schema_version(conn)?;
    let score_version = migrations::get_score_version(conn)?;
    let strategy_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM strategies", [], |row| row.get(0))?;

    Ok(HealthReport {
        integrity_ok: integrity == "ok",
        integrity_details: integrity,
        schema_version,
        score_version,
        strategy_count: strategy_count as u64,
    })
}
