//! CLI `submit` command — file a strategy from a JSON document.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::QuantMindConfig;
use crate::vault::store;
use crate::vault::types::StrategySubmission;

/// On-disk submission format; mirrors the `submit_alpha_telemetry` tool arguments.
#[derive(Debug, Deserialize)]
struct SubmissionFile {
    strategy_name: String,
    #[serde(default)]
    hypothesis: String,
    #[serde(default)]
    code: String,
    metrics: BTreeMap<String, serde_json::Value>,
    parameters: Option<BTreeMap<String, serde_json::Value>>,
}

/// Validate and store the submission in `path`, printing the outcome as JSON.
pub fn submit(config: &QuantMindConfig, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: SubmissionFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse submission JSON in {}", path.display()))?;

    let submission = StrategySubmission::from_json(
        &file.strategy_name,
        &file.hypothesis,
        &file.code,
        &file.metrics,
        file.parameters.as_ref(),
    )?;

    let mut conn = crate::db::open_database(config.resolved_db_path())?;
    let outcome = store::submit(
        &mut conn,
        &submission,
        &config.vault.thresholds(),
        &config.vault.score_weights(),
    )?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if outcome.accepted {
        eprintln!("Accepted '{}'.", submission.name);
    } else {
        for failure in &outcome.failures {
            eprintln!("  - {failure}");
        }
    }

    Ok(())
}
