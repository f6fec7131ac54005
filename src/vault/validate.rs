//! The acceptance gate.
//!
//! [`validate`] checks the four core metrics independently and never stops at the
//! first failure: the caller gets every failing metric at once, with the offending
//! value and the threshold, so it can refine the strategy in one step.

use serde::{Deserialize, Serialize};

use super::types::StrategySubmission;

pub const SHARPE_RATIO: &str = "sharpe_ratio";
pub const TOTAL_TRADES: &str = "total_trades";
pub const MAX_DRAWDOWN: &str = "max_drawdown";
pub const WIN_RATE: &str = "win_rate";

/// Metrics every submission must carry, in the order they are checked.
pub const REQUIRED_METRICS: [&str; 4] = [SHARPE_RATIO, TOTAL_TRADES, MAX_DRAWDOWN, WIN_RATE];

/// Minimum values for the core metrics. All are "at least" comparisons;
/// drawdown is non-positive, so `-0.30` means "no worse than a 30% decline".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_sharpe: f64,
    pub min_trades: f64,
    pub min_drawdown: f64,
    pub min_win_rate: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_sharpe: 1.5,
            min_trades: 100.0,
            min_drawdown: -0.30,
            min_win_rate: 0.45,
        }
    }
}

impl Thresholds {
    /// Threshold for one of the [`REQUIRED_METRICS`].
    pub fn for_metric(&self, metric: &str) -> Option<f64> {
        match metric {
            SHARPE_RATIO => Some(self.min_sharpe),
            TOTAL_TRADES => Some(self.min_trades),
            MAX_DRAWDOWN => Some(self.min_drawdown),
            WIN_RATE => Some(self.min_win_rate),
            _ => None,
        }
    }
}

/// Why a submission was not accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The metric is present and well-formed but under its minimum.
    BelowThreshold {
        metric: String,
        value: f64,
        threshold: f64,
    },
    /// A required metric key is absent.
    MissingMetric { metric: String, threshold: f64 },
    /// The metric is NaN/infinite or outside its domain (e.g. a positive drawdown).
    InvalidMetricValue {
        metric: String,
        value: f64,
        reason: String,
    },
    /// An accepted strategy already uses this name.
    DuplicateStrategyName { name: String },
}

impl FailureReason {
    /// The metric this failure refers to, if any.
    pub fn metric(&self) -> Option<&str> {
        match self {
            Self::BelowThreshold { metric, .. }
            | Self::MissingMetric { metric, .. }
            | Self::InvalidMetricValue { metric, .. } => Some(metric),
            Self::DuplicateStrategyName { .. } => None,
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowThreshold {
                metric,
                value,
                threshold,
            } => write!(f, "{metric} {value} is below the minimum {threshold}"),
            Self::MissingMetric { metric, threshold } => {
                write!(f, "{metric} is missing (minimum {threshold})")
            }
            Self::InvalidMetricValue {
                metric,
                value,
                reason,
            } => write!(f, "{metric} {value} is invalid: {reason}"),
            Self::DuplicateStrategyName { name } => {
                write!(f, "a strategy named {name:?} is already in the vault")
            }
        }
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub failures: Vec<FailureReason>,
}

impl ValidationResult {
    /// Names of the metrics that failed, in check order.
    pub fn failed_metrics(&self) -> Vec<&str> {
        self.failures.iter().filter_map(FailureReason::metric).collect()
    }
}

/// Check a submission against the thresholds. Pure: no I/O, no side effects.
pub fn validate(submission: &StrategySubmission, thresholds: &Thresholds) -> ValidationResult {
    let mut failures = Vec::new();

    for metric in REQUIRED_METRICS {
        // for_metric covers every REQUIRED_METRICS entry
        let threshold = thresholds.for_metric(metric).unwrap_or(f64::NAN);
        if let Some(failure) = check_metric(submission, metric, threshold) {
            failures.push(failure);
        }
    }

    // Optional KPIs are preserved as-is but still have to be real numbers
    for (metric, &value) in &submission.metrics {
        if REQUIRED_METRICS.contains(&metric.as_str()) || value.is_finite() {
            continue;
        }
        failures.push(FailureReason::InvalidMetricValue {
            metric: metric.clone(),
            value,
            reason: "must be a finite number".into(),
        });
    }

    ValidationResult {
        passed: failures.is_empty(),
        failures,
    }
}

fn check_metric(
    submission: &StrategySubmission,
    metric: &str,
    threshold: f64,
) -> Option<FailureReason> {
    let Some(&value) = submission.metrics.get(metric) else {
        return Some(FailureReason::MissingMetric {
            metric: metric.to_string(),
            threshold,
        });
    };

    if let Some(reason) = domain_error(metric, value) {
        return Some(FailureReason::InvalidMetricValue {
            metric: metric.to_string(),
            value,
            reason: reason.to_string(),
        });
    }

    (value < threshold).then(|| FailureReason::BelowThreshold {
        metric: metric.to_string(),
        value,
        threshold,
    })
}

fn domain_error(metric: &str, value: f64) -> Option<&'static str> {
    if !value.is_finite() {
        return Some("must be a finite number");
    }
    match metric {
        TOTAL_TRADES if value < 0.0 || value.fract() != 0.0 => {
            Some("must be a non-negative whole number")
        }
        MAX_DRAWDOWN if value > 0.0 => Some("drawdown is expressed as a non-positive fraction"),
        WIN_RATE if !(0.0..=1.0).contains(&value) => Some("must be a fraction between 0 and 1"),
        _ => None,
    }
}
