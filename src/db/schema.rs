//! SQL DDL for the alpha vault.
//!
//! Defines the append-only `strategies` table and the `schema_meta` key/value
//! table. All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for the vault's tables.
const SCHEMA_SQL: &str = r#"
-- Accepted strategies (append-only)
CREATE TABLE IF NOT EXISTS strategies (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE CHECK(length(name) > 0),
    hypothesis TEXT NOT NULL,
    code TEXT NOT NULL,
    metrics TEXT NOT NULL,
    parameters TEXT NOT NULL,
    quality_score REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_strategies_name ON strategies(name);
CREATE INDEX IF NOT EXISTS idx_strategies_quality ON strategies(quality_score DESC, created_at ASC);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"strategies".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }

    #[test]
    fn duplicate_name_violates_unique_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let insert = "INSERT INTO strategies \
             (id, name, hypothesis, code, metrics, parameters, quality_score, created_at) \
             VALUES (?1, 'dup', '', '', '{}', '{}', 0.5, '2025-01-01T00:00:00.000000Z')";
        conn.execute(insert, ["a"]).unwrap();
        let err = conn.execute(insert, ["b"]).unwrap_err();
        assert_eq!(
            err.sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        );
    }

    #[test]
    fn empty_name_is_rejected_by_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO strategies \
             (id, name, hypothesis, code, metrics, parameters, quality_score, created_at) \
             VALUES ('x', '', '', '', '{}', '{}', 0.5, '2025-01-01T00:00:00.000000Z')",
            [],
        );
        assert!(result.is_err());
    }
}
