use anyhow::Result;

use crate::config::QuantMindConfig;

/// Display vault statistics in the terminal.
pub fn stats(config: &QuantMindConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let response = crate::vault::stats::vault_stats(&conn, Some(db_path.as_path()))?;

    println!("Alpha Vault Statistics");
    println!("{}", "=".repeat(40));
    println!("  Accepted strategies: {}", response.total_strategies);
    if let Some(best) = response.best_quality_score {
        println!("  Best quality score:  {best:.4}");
    }
    if let Some(mean) = response.mean_quality_score {
        println!("  Mean quality score:  {mean:.4}");
    }
    println!();

    let thresholds = config.vault.thresholds();
    println!("Acceptance thresholds:");
    println!("  sharpe_ratio  >= {}", thresholds.min_sharpe);
    println!("  total_trades  >= {}", thresholds.min_trades);
    println!("  max_drawdown  >= {}", thresholds.min_drawdown);
    println!("  win_rate      >= {}", thresholds.min_win_rate);
    println!();

    println!("Database size:         {} bytes", response.db_size_bytes);
    if let Some(ref oldest) = response.oldest {
        println!("Oldest strategy:       {oldest}");
    }
    if let Some(ref newest) = response.newest {
        println!("Newest strategy:       {newest}");
    }

    Ok(())
}
