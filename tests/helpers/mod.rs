#![allow(dead_code)]

use quantmind::db;
use quantmind::vault::score::ScoreWeights;
use quantmind::vault::store::{self, SubmitOutcome};
use quantmind::vault::types::{Metrics, ParamValue, StrategySubmission};
use quantmind::vault::validate::Thresholds;
use rusqlite::{params, Connection};
use std::path::Path;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// A submission carrying the four core metrics and one parameter.
pub fn submission(
    name: &str,
    sharpe: f64,
    trades: f64,
    drawdown: f64,
    win_rate: f64,
) -> StrategySubmission {
    let metrics: Metrics = [
        ("sharpe_ratio", sharpe),
        ("total_trades", trades),
        ("max_drawdown", drawdown),
        ("win_rate", win_rate),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    StrategySubmission {
        name: name.to_string(),
        hypothesis: "Short-term overreaction reverts within five sessions".into(),
        code: "def signal(df):\n    return (df.close - df.close.rolling(20).mean()) / df.close.rolling(20).std()\n".into(),
        metrics,
        parameters: [("lookback".to_string(), ParamValue::Integer(20))].into(),
    }
}

/// Submit with default thresholds and weights.
pub fn submit(conn: &mut Connection, sub: &StrategySubmission) -> SubmitOutcome {
    store::submit(conn, sub, &Thresholds::default(), &ScoreWeights::default()).unwrap()
}

/// Insert an accepted row directly, bypassing scoring, to control score and time.
pub fn insert_scored(conn: &Connection, name: &str, quality_score: f64, created_at: &str) -> String {
    let id = format!("id-{name}");
    conn.execute(
        "INSERT INTO strategies \
         (id, name, hypothesis, code, metrics, parameters, quality_score, created_at) \
         VALUES (?1, ?2, '', '', '{}', '{}', ?3, ?4)",
        params![id, name, quality_score, created_at],
    )
    .unwrap();
    id
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_doc(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// A small corpus of research notes.
pub fn seed_corpus(root: &Path) {
    write_doc(
        root,
        "momentum.md",
        "# Time-Series Momentum\n\nAssets with positive trailing returns keep rising. \
         Momentum is strongest over a twelve-month lookback.\n",
    );
    write_doc(
        root,
        "mean_reversion.md",
        "# Mean Reversion in Equities\n\nShort-horizon returns revert. A z-score of the \
         price against its rolling mean gives the entry signal.\n",
    );
    write_doc(
        root,
        "derivatives/volatility.txt",
        "Volatility risk premium: implied volatility exceeds realised volatility on average.\n",
    );
    write_doc(root, "notes/ignored.csv", "momentum,momentum,momentum\n");
}
