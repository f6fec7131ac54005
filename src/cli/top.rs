use anyhow::Result;

use crate::config::QuantMindConfig;
use crate::vault::validate::{MAX_DRAWDOWN, SHARPE_RATIO, WIN_RATE};

/// Print the best strategies in the vault.
pub fn top(config: &QuantMindConfig, n: Option<usize>) -> Result<()> {
    let conn = crate::db::open_database(config.resolved_db_path())?;
    let n = n.unwrap_or(config.vault.default_top_n);

    let strategies = crate::vault::store::list_top(&conn, n)?;

    if strategies.is_empty() {
        println!("The vault is empty.");
        return Ok(());
    }

    println!(
        "{:>3}  {:<28} {:>8} {:>7} {:>9} {:>7}  {}",
        "#", "name", "score", "sharpe", "drawdown", "win", "accepted"
    );
    for (i, s) in strategies.iter().enumerate() {
        let metric = |key: &str| s.metrics.get(key).copied().unwrap_or(f64::NAN);
        println!(
            "{:>3}  {:<28} {:>8.4} {:>7.2} {:>9.2} {:>7.2}  {}",
            i + 1,
            super::preview(&s.name, 25),
            s.quality_score,
            metric(SHARPE_RATIO),
            metric(MAX_DRAWDOWN),
            metric(WIN_RATE),
            s.created_at,
        );
    }

    Ok(())
}
