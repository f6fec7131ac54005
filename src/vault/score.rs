//! Quality score used to rank accepted strategies.
//!
//! ```text
//! score = w_sharpe   * s / (s + sharpe_scale)      s = max(sharpe, 0)
//!       + w_drawdown * (1 + clamp(max_drawdown, -1, 0))
//!       + w_win_rate * clamp(win_rate, 0, 1)
//! ```
//!
//! Each term lies in `[0, 1]`, so with the default weights (summing to 1) the score
//! does too. With every weight positive the score is strictly increasing in Sharpe
//! (from zero up), in win rate, and in drawdown as it approaches zero. Config
//! validation keeps weights positive and `min_sharpe` non-negative, so every
//! accepted strategy sits in that range.

use serde::{Deserialize, Serialize};

use super::types::Metrics;
use super::validate::{MAX_DRAWDOWN, SHARPE_RATIO, WIN_RATE};

/// Identifies this formula in `schema_meta`. Bump when the formula changes.
pub const SCORE_VERSION: &str = "weighted-v1";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub sharpe: f64,
    pub drawdown: f64,
    pub win_rate: f64,
    /// Sharpe value at which the Sharpe term reaches one half.
    pub sharpe_scale: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            sharpe: 0.5,
            drawdown: 0.3,
            win_rate: 0.2,
            sharpe_scale: 2.0,
        }
    }
}

pub fn quality_score(sharpe: f64, max_drawdown: f64, win_rate: f64, weights: &ScoreWeights) -> f64 {
    let s = sharpe.max(0.0);
    let sharpe_term = s / (s + weights.sharpe_scale);
    let drawdown_term = 1.0 + max_drawdown.clamp(-1.0, 0.0);
    let win_term = win_rate.clamp(0.0, 1.0);

    weights.sharpe * sharpe_term + weights.drawdown * drawdown_term + weights.win_rate * win_term
}

/// Score a metrics map. `None` if a core metric is absent.
pub fn score_metrics(metrics: &Metrics, weights: &ScoreWeights) -> Option<f64> {
    Some(quality_score(
        *metrics.get(SHARPE_RATIO)?,
        *metrics.get(MAX_DRAWDOWN)?,
        *metrics.get(WIN_RATE)?,
        weights,
    ))
}
