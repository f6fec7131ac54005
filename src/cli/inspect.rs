//! CLI `inspect` command — display full details for a single strategy.

use anyhow::{Context, Result};

use crate::config::QuantMindConfig;

/// Inspect a single accepted strategy by ID and display full details.
pub fn inspect(config: &QuantMindConfig, id: &str) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;

    let s = crate::vault::store::get_strategy(&conn, id)?
        .with_context(|| format!("strategy not found: {id}"))?;

    println!("Strategy: {}", s.id);
    println!("{}", "=".repeat(50));
    println!("  Name:           {}", s.name);
    println!("  Quality score:  {:.4}", s.quality_score);
    println!("  Accepted:       {}", s.created_at);
    println!();
    println!("Hypothesis:");
    println!("  {}", s.hypothesis);
    println!();
    println!("Metrics:");
    for (key, value) in &s.metrics {
        println!("  {key:<20} {value}");
    }
    if !s.parameters.is_empty() {
        println!();
        println!("Parameters:");
        for (key, value) in &s.parameters {
            println!("  {key:<20} {value}");
        }
    }
    println!();
    println!("Code:");
    for line in s.code.lines() {
        println!("  {line}");
    }

    Ok(())
}
