//! MCP `submit_alpha_telemetry` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameters for the `submit_alpha_telemetry` MCP tool.
///
/// `metrics` and `parameters` arrive as loose JSON and are checked at the boundary
/// by [`StrategySubmission::from_json`](crate::vault::types::StrategySubmission::from_json).
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SubmitAlphaTelemetryParams {
    /// Unique name; a name already in the vault is rejected.
    #[schemars(description = "Unique strategy name (e.g. 'meanrev_v1')")]
    pub strategy_name: String,

    #[schemars(description = "The market hypothesis the strategy exploits")]
    pub hypothesis: String,

    #[schemars(description = "Strategy source code. Stored verbatim, never executed.")]
    pub code: String,

    /// Numeric KPIs from the client-side backtest.
    #[schemars(
        description = "Backtest metrics. Required: sharpe_ratio, total_trades, max_drawdown (non-positive fraction, e.g. -0.22), win_rate (fraction, e.g. 0.52). Extra numeric KPIs such as sortino_ratio are kept."
    )]
    pub metrics: BTreeMap<String, serde_json::Value>,

    /// Strategy configuration: numbers, strings, or booleans.
    #[schemars(description = "Strategy parameters as a flat map of numbers, strings, or booleans")]
    pub parameters: Option<BTreeMap<String, serde_json::Value>>,
}
