//! Typed strategy records.
//!
//! Callers send metrics and parameters as loose JSON maps. [`StrategySubmission::from_json`]
//! is the boundary: every metric must be a JSON number and every parameter a scalar
//! (number, string, boolean), and keys must be plain identifiers. Anything else is
//! rejected as [`Error::MalformedInput`] rather than coerced.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Named numeric KPIs, e.g. `sharpe_ratio`, `total_trades`, `sortino_ratio`.
pub type Metrics = BTreeMap<String, f64>;

/// Strategy configuration, keyed by parameter name.
pub type Parameters = BTreeMap<String, ParamValue>;

/// Longest accepted metric or parameter key.
const MAX_KEY_LEN: usize = 64;

/// A single strategy parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Convert a JSON value, rejecting `null`, arrays, and objects.
    pub fn from_json(key: &str, value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Self::Integer(i)),
                // Integers beyond i64 would lose precision as a float
                (None, _) if n.is_u64() => Err(Error::MalformedInput(format!(
                    "parameter `{key}` is an integer outside the 64-bit signed range: {n}"
                ))),
                (None, Some(f)) => Ok(Self::Float(f)),
                (None, None) => Err(Error::MalformedInput(format!(
                    "parameter `{key}` is not representable as a number: {n}"
                ))),
            },
            other => Err(Error::MalformedInput(format!(
                "parameter `{key}` must be a number, string, or boolean, got {}",
                json_kind(other)
            ))),
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A caller-proposed strategy, not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySubmission {
    pub name: String,
    pub hypothesis: String,
    /// Stored verbatim, never executed.
    pub code: String,
    pub metrics: Metrics,
    #[serde(default)]
    pub parameters: Parameters,
}

impl StrategySubmission {
    /// Build a typed submission from the raw tool-call arguments.
    pub fn from_json(
        name: &str,
        hypothesis: &str,
        code: &str,
        metrics: &BTreeMap<String, serde_json::Value>,
        parameters: Option<&BTreeMap<String, serde_json::Value>>,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MalformedInput("strategy_name must not be empty".into()));
        }

        let mut typed_metrics = Metrics::new();
        for (key, value) in metrics {
            check_key("metric", key)?;
            let number = value.as_f64().ok_or_else(|| {
                Error::MalformedInput(format!(
                    "metric `{key}` must be a number, got {}",
                    json_kind(value)
                ))
            })?;
            typed_metrics.insert(key.clone(), number);
        }

        let mut typed_params = Parameters::new();
        for (key, value) in parameters.into_iter().flatten() {
            check_key("parameter", key)?;
            typed_params.insert(key.clone(), ParamValue::from_json(key, value)?);
        }

        Ok(Self {
            name: name.to_string(),
            hypothesis: hypothesis.to_string(),
            code: code.to_string(),
            metrics: typed_metrics,
            parameters: typed_params,
        })
    }
}

/// A submission that passed validation and was persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedStrategy {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    pub name: String,
    pub hypothesis: String,
    pub code: String,
    pub metrics: Metrics,
    pub parameters: Parameters,
    pub quality_score: f64,
    /// RFC 3339 UTC acceptance timestamp, microsecond precision.
    pub created_at: String,
}

fn check_key(kind: &str, key: &str) -> Result<()> {
    let well_formed = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if well_formed {
        Ok(())
    } else {
        Err(Error::MalformedInput(format!(
            "{kind} key {key:?} must be 1-{MAX_KEY_LEN} characters of [A-Za-z0-9_.-]"
        )))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
