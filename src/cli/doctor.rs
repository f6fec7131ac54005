//! CLI `doctor` command — run database and corpus diagnostics.

use anyhow::{Context, Result};

use crate::config::QuantMindConfig;
use crate::db;
use crate::knowledge::KnowledgeBase;
use crate::vault::score::SCORE_VERSION;

/// Run diagnostics and print a health report.
pub fn doctor(config: &QuantMindConfig) -> Result<()> {
    println!("QuantMind Health Report");
    println!("=======================");
    println!();

    let db_path = config.resolved_db_path();
    if db_path.exists() {
        let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

        let conn = db::open_database(&db_path)
            .context("failed to open database (may be corrupt)")?;
        let report = db::check_database_health(&conn)
            .context("failed to run health check")?;

        println!("Database:          {}", db_path.display());
        println!("File size:         {}", format_bytes(file_size));
        println!("Schema version:    {}", report.schema_version);
        println!("Strategies:        {}", report.strategy_count);
        println!();
        println!("Score formula:");
        println!("  Stored:          {}", report.score_version.as_deref().unwrap_or("(not set)"));
        println!("  Current:         {SCORE_VERSION}");
        if let Some(ref stored) = report.score_version {
            if stored != SCORE_VERSION {
                println!("  WARNING: stored scores come from a different formula.");
            } else {
                println!("  Status:          OK (match)");
            }
        }
        println!();
        if report.integrity_ok {
            println!("Integrity check:   PASSED");
        } else {
            println!("Integrity check:   FAILED ({})", report.integrity_details);
            println!();
            println!("Recovery steps:");
            println!("  1. Restore from a backup: cp backup.db {}", db_path.display());
            println!("  2. Or export what is still readable: quantmind export > vault.json");
        }
    } else {
        println!("Database:          not found at {}", db_path.display());
        println!("                   (created on first `quantmind serve` or `quantmind submit`)");
    }
    println!();

    let knowledge = KnowledgeBase::from_config(config.resolved_research_path(), &config.knowledge);
    print!("Research papers:   {}", knowledge.root().display());
    match knowledge.documents() {
        Ok(docs) => println!(" ({} documents)", docs.len()),
        Err(e) => println!(" (ERROR: {e})"),
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
