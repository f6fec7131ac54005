//! Write and read paths for accepted strategies.
//!
//! [`submit`] is the single entry point for writes: validate → uniqueness check →
//! score → insert. The uniqueness check and the insert share one `BEGIN IMMEDIATE`
//! transaction, so two submissions with the same name cannot both pass, and a
//! reader never sees a half-written row. Rows are never updated or deleted.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::vault::score::{score_metrics, ScoreWeights};
use crate::vault::types::{AcceptedStrategy, StrategySubmission};
use crate::vault::validate::{validate, FailureReason, Thresholds};

/// Result of a [`submit`] call. A rejection is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureReason>,
}

impl SubmitOutcome {
    fn accepted(id: String, quality_score: f64) -> Self {
        Self {
            accepted: true,
            id: Some(id),
            quality_score: Some(quality_score),
            failures: Vec::new(),
        }
    }

    fn rejected(failures: Vec<FailureReason>) -> Self {
        Self {
            accepted: false,
            id: None,
            quality_score: None,
            failures,
        }
    }

    fn duplicate(name: &str) -> Self {
        Self::rejected(vec![FailureReason::DuplicateStrategyName {
            name: name.to_string(),
        }])
    }

    /// `true` if the submission was turned away because its name is taken.
    pub fn is_duplicate(&self) -> bool {
        self.failures
            .iter()
            .any(|f| matches!(f, FailureReason::DuplicateStrategyName { .. }))
    }
}

/// Validate a submission and, if it passes, persist it with its quality score.
///
/// Rejections write nothing. Only storage and serialization problems are `Err`.
pub fn submit(
    conn: &mut Connection,
    submission: &StrategySubmission,
    thresholds: &Thresholds,
    weights: &ScoreWeights,
) -> Result<SubmitOutcome> {
    // 1. Validation gate
    let validation = validate(submission, thresholds);
    if !validation.passed {
        tracing::info!(
            name = %submission.name,
            failed = ?validation.failed_metrics(),
            "submission rejected by validation"
        );
        return Ok(SubmitOutcome::rejected(validation.failures));
    }

    // 2. Score (pure, outside the write lock)
    let quality_score = score_metrics(&submission.metrics, weights).ok_or_else(|| {
        Error::MalformedInput("validated submission is missing a core metric".into())
    })?;

    let metrics_json = serde_json::to_string(&submission.metrics)?;
    let parameters_json = serde_json::to_string(&submission.parameters)?;

    // 3. Uniqueness check + insert under the database write lock
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if name_exists(&tx, &submission.name)? {
        tracing::info!(name = %submission.name, "submission rejected: duplicate name");
        return Ok(SubmitOutcome::duplicate(&submission.name));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let created_at = now_timestamp();

    let inserted = tx.execute(
        "INSERT INTO strategies \
         (id, name, hypothesis, code, metrics, parameters, quality_score, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            submission.name,
            submission.hypothesis,
            submission.code,
            metrics_json,
            parameters_json,
            quality_score,
            created_at,
        ],
    );
    match inserted {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Ok(SubmitOutcome::duplicate(&submission.name));
        }
        Err(e) => return Err(e.into()),
    }

    tx.commit()?;

    tracing::info!(id = %id, name = %submission.name, quality_score, "strategy accepted");
    Ok(SubmitOutcome::accepted(id, quality_score))
}

/// The `n` best strategies by quality score; ties go to the earlier acceptance.
pub fn list_top(conn: &Connection, n: usize) -> Result<Vec<AcceptedStrategy>> {
    if n == 0 {
        return Err(Error::MalformedInput("n must be at least 1".into()));
    }
    let limit = i64::try_from(n).unwrap_or(i64::MAX);
    query_strategies(
        conn,
        &format!("{SELECT_COLUMNS} ORDER BY quality_score DESC, created_at ASC, rowid ASC LIMIT ?1"),
        params![limit],
    )
}

/// Look up an accepted strategy by id.
pub fn get_strategy(conn: &Connection, id: &str) -> Result<Option<AcceptedStrategy>> {
    let rows = query_strategies(conn, &format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id])?;
    Ok(rows.into_iter().next())
}

/// Look up an accepted strategy by its unique name.
pub fn get_strategy_by_name(conn: &Connection, name: &str) -> Result<Option<AcceptedStrategy>> {
    let rows = query_strategies(
        conn,
        &format!("{SELECT_COLUMNS} WHERE name = ?1"),
        params![name],
    )?;
    Ok(rows.into_iter().next())
}

/// Every accepted strategy in acceptance order.
pub fn export_all(conn: &Connection) -> Result<Vec<AcceptedStrategy>> {
    query_strategies(
        conn,
        &format!("{SELECT_COLUMNS} ORDER BY created_at ASC, rowid ASC"),
        params![],
    )
}

/// RFC 3339 UTC with fixed microsecond precision, so string order is time order.
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

// ── Internal ──────────────────────────────────────────────────────────────────

const SELECT_COLUMNS: &str = "SELECT id, name, hypothesis, code, metrics, parameters, \
     quality_score, created_at FROM strategies";

struct StrategyRow {
    id: String,
    name: String,
    hypothesis: String,
    code: String,
    metrics: String,
    parameters: String,
    quality_score: f64,
    created_at: String,
}

impl StrategyRow {
    fn into_strategy(self) -> Result<AcceptedStrategy> {
        Ok(AcceptedStrategy {
            id: self.id,
            name: self.name,
            hypothesis: self.hypothesis,
            code: self.code,
            metrics: serde_json::from_str(&self.metrics)?,
            parameters: serde_json::from_str(&self.parameters)?,
            quality_score: self.quality_score,
            created_at: self.created_at,
        })
    }
}

fn query_strategies(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<AcceptedStrategy>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok(StrategyRow {
                id: row.get(0)?,
                name: row.get(1)?,
                hypothesis: row.get(2)?,
                code: row.get(3)?,
                metrics: row.get(4)?,
                parameters: row.get(5)?,
                quality_score: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(StrategyRow::into_strategy).collect()
}

fn name_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM strategies WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
