use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;

/// Response from vault_stats.
#[derive(Debug, Serialize)]
pub struct VaultStats {
    pub total_strategies: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_quality_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_quality_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest: Option<String>,
    pub db_size_bytes: u64,
}

/// Aggregate figures over the accepted strategies.
///
/// `db_path` is used for file size calculation; pass None for in-memory databases.
pub fn vault_stats(conn: &Connection, db_path: Option<&Path>) -> Result<VaultStats> {
    let (total, best, mean, oldest, newest): (i64, Option<f64>, Option<f64>, Option<String>, Option<String>) =
        conn.query_row(
            "SELECT COUNT(*), MAX(quality_score), AVG(quality_score), MIN(created_at), MAX(created_at) \
             FROM strategies",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(VaultStats {
        total_strategies: total as u64,
        best_quality_score: best,
        mean_quality_score: mean,
        oldest,
        newest,
        db_size_bytes,
    })
}
