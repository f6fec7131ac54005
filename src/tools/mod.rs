pub mod get_strategy;
pub mod list_top_strategies;
pub mod search_knowledge_base;
pub mod submit_alpha_telemetry;

use get_strategy::GetStrategyParams;
use list_top_strategies::ListTopStrategiesParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use rusqlite::Connection;
use search_knowledge_base::SearchKnowledgeBaseParams;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use submit_alpha_telemetry::SubmitAlphaTelemetryParams;

use crate::config::QuantMindConfig;
use crate::error::Error;
use crate::knowledge::KnowledgeBase;
use crate::vault::store::{self, SubmitOutcome};
use crate::vault::types::StrategySubmission;
use crate::vault::validate::Thresholds;

/// The QuantMind MCP tool handler. Holds shared state (db connection, knowledge base,
/// config) and exposes all MCP tools via the `#[tool_router]` macro.
///
/// The connection mutex is the vault's single write lock: a submission holds it
/// from the uniqueness check through the commit.
#[derive(Clone)]
pub struct QuantMindTools {
    tool_router: ToolRouter<Self>,
    db: Arc<Mutex<Connection>>,
    knowledge: Arc<KnowledgeBase>,
    config: Arc<QuantMindConfig>,
}

/// `submit_alpha_telemetry` response body.
#[derive(Debug, Serialize)]
struct SubmitResponse {
    #[serde(flatten)]
    outcome: SubmitOutcome,
    /// Thresholds in effect, included on rejection so the caller can self-correct.
    #[serde(skip_serializing_if = "Option::is_none")]
    thresholds: Option<Thresholds>,
    message: String,
}

#[tool_router]
impl QuantMindTools {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        knowledge: Arc<KnowledgeBase>,
        config: Arc<QuantMindConfig>,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            knowledge,
            config,
        }
    }

    /// Search the research-paper knowledge base.
    #[tool(description = "Search the quantitative finance knowledge base of research papers. Returns ranked excerpts on topics like momentum, mean reversion, volatility trading, and pairs trading. Use it for theoretical background before designing a strategy.")]
    async fn search_knowledge_base(
        &self,
        Parameters(params): Parameters<SearchKnowledgeBaseParams>,
    ) -> Result<String, String> {
        let max_results = params
            .max_results
            .unwrap_or(self.config.knowledge.default_max_results)
            .min(self.config.knowledge.max_results_cap);

        tracing::info!(query = %params.query, max_results, "search_knowledge_base called");

        // Directory walk + file reads → spawn_blocking
        let knowledge = Arc::clone(&self.knowledge);
        let query = params.query.clone();
        let hits = tokio::task::spawn_blocking(move || knowledge.search(&query, max_results))
            .await
            .map_err(|e| internal(format!("search task failed: {e}")))?
            .map_err(|e| report("search failed", &e))?;

        to_json(&serde_json::json!({
            "query": params.query,
            "results": hits,
            "total": hits.len(),
        }))
    }

    /// Validate a backtested strategy and store it in the alpha vault if it qualifies.
    #[tool(description = "Submit a backtested strategy to the Alpha Vault. The server validates metrics (sharpe_ratio >= 1.5, total_trades >= 100, max_drawdown >= -0.30, win_rate >= 0.45) and stores qualifying strategies with a quality score. A rejection lists every failing metric with its value and threshold. The server never executes strategies.")]
    async fn submit_alpha_telemetry(
        &self,
        Parameters(params): Parameters<SubmitAlphaTelemetryParams>,
    ) -> Result<String, String> {
        // 1. Boundary: loose JSON → typed submission
        let submission = StrategySubmission::from_json(
            &params.strategy_name,
            &params.hypothesis,
            &params.code,
            &params.metrics,
            params.parameters.as_ref(),
        )
        .map_err(|e| report("invalid submission", &e))?;

        tracing::info!(
            name = %submission.name,
            metrics = submission.metrics.len(),
            parameters = submission.parameters.len(),
            "submit_alpha_telemetry called"
        );

        // 2. Validate + persist (sync DB ops → spawn_blocking)
        let thresholds = self.config.vault.thresholds();
        let weights = self.config.vault.score_weights();
        let outcome = self
            .with_db(move |conn| store::submit(conn, &submission, &thresholds, &weights))
            .await?;

        let message = if outcome.accepted {
            "Strategy accepted into the Alpha Vault.".to_string()
        } else {
            let reasons: Vec<String> = outcome.failures.iter().map(ToString::to_string).collect();
            format!("Strategy rejected: {}", reasons.join("; "))
        };
        let response = SubmitResponse {
            thresholds: (!outcome.accepted).then_some(thresholds),
            outcome,
            message,
        };

        to_json(&response)
    }

    /// List the best strategies in the vault.
    #[tool(description = "List accepted strategies ranked by quality score (highest first; ties go to the earlier discovery).")]
    async fn list_top_strategies(
        &self,
        Parameters(params): Parameters<ListTopStrategiesParams>,
    ) -> Result<String, String> {
        let n = params.n.unwrap_or(self.config.vault.default_top_n);
        tracing::info!(n, "list_top_strategies called");

        let strategies = self.with_db(move |conn| store::list_top(conn, n)).await?;

        to_json(&serde_json::json!({
            "strategies": strategies,
            "total": strategies.len(),
        }))
    }

    /// Fetch one accepted strategy by ID.
    #[tool(description = "Fetch an accepted strategy by ID, including its code, metrics, and parameters.")]
    async fn get_strategy(
        &self,
        Parameters(params): Parameters<GetStrategyParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, "get_strategy called");

        let id = params.id.clone();
        let strategy = self
            .with_db(move |conn| store::get_strategy(conn, &id))
            .await?
            .ok_or_else(|| {
                tracing::warn!(id = %params.id, "strategy not found");
                error_body("not_found", true, format!("strategy not found: {}", params.id))
            })?;

        to_json(&strategy)
    }
}

impl QuantMindTools {
    /// Run a vault operation on the blocking pool while holding the connection lock.
    async fn with_db<T, F>(&self, f: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> crate::error::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut conn = db
                .lock()
                .map_err(|e| internal(format!("db lock poisoned: {e}")))?;
            f(&mut conn).map_err(|e| report("vault operation failed", &e))
        })
        .await
        .map_err(|e| internal(format!("db task failed: {e}")))?
    }
}

/// Error payload sent to the client:
/// `{"error": {"kind": ..., "user_input": ..., "message": ...}}`.
///
/// `user_input` tells the agent whether changing its arguments can help; when
/// `false` the tool itself is broken and a retry is the only option.
fn error_body(kind: &str, user_input: bool, message: String) -> String {
    serde_json::json!({
        "error": {
            "kind": kind,
            "user_input": user_input,
            "message": message,
        }
    })
    .to_string()
}

/// Log an error at a level matching its class and render it for the client.
fn report(context: &str, err: &Error) -> String {
    if err.is_user_input() {
        tracing::warn!(error = %err, "{context}");
    } else {
        tracing::error!(error = %err, "{context}");
    }
    error_body(err.kind(), err.is_user_input(), format!("{context}: {err}"))
}

/// Failures outside the core taxonomy: panicked tasks, a poisoned lock.
fn internal(message: String) -> String {
    tracing::error!("{message}");
    error_body("internal", false, message)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| report("serialization failed", &Error::from(e)))
}

#[tool_handler]
impl ServerHandler for QuantMindTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "QuantMind provides quant research tools. Use search_knowledge_base for \
                 background on strategy ideas, submit_alpha_telemetry to file a backtested \
                 strategy with the Alpha Vault, and list_top_strategies / get_strategy to \
                 review what has been accepted."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn build_tools(config: QuantMindConfig, root: &std::path::Path) -> QuantMindTools {
        let conn = crate::db::open_memory_database().unwrap();
        let knowledge = KnowledgeBase::from_config(root, &config.knowledge);
        QuantMindTools::new(
            Arc::new(Mutex::new(conn)),
            Arc::new(knowledge),
            Arc::new(config),
        )
    }

    fn corpus(docs: usize) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for i in 0..docs {
            std::fs::write(
                tmp.path().join(format!("paper_{i:02}.md")),
                format!("# Paper {i}\n{}", "alpha ".repeat(i + 1)),
            )
            .unwrap();
        }
        tmp
    }

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    fn submit_params(value: Value) -> Parameters<SubmitAlphaTelemetryParams> {
        Parameters(serde_json::from_value(value).unwrap())
    }

    fn meanrev(name: &str, sharpe: f64) -> Value {
        json!({
            "strategy_name": name,
            "hypothesis": "Short-term overreaction reverts",
            "code": "def signal(df): return -df.ret.rolling(5).sum()",
            "metrics": {
                "sharpe_ratio": sharpe,
                "total_trades": 120,
                "max_drawdown": -0.22,
                "win_rate": 0.52
            },
            "parameters": {"lookback": 5}
        })
    }

    #[tokio::test]
    async fn search_defaults_to_five_results() {
        let tmp = corpus(7);
        let tools = build_tools(QuantMindConfig::default(), tmp.path());

        let body = tools
            .search_knowledge_base(Parameters(SearchKnowledgeBaseParams {
                query: "alpha".into(),
                max_results: None,
            }))
            .await
            .unwrap();
        let json = parse(&body);

        assert_eq!(json["total"], 5);
        assert_eq!(json["results"].as_array().unwrap().len(), 5);
        assert_eq!(json["results"][0]["source_path"], "paper_06.md");
    }

    #[tokio::test]
    async fn search_clamps_to_configured_cap() {
        let tmp = corpus(7);
        let mut config = QuantMindConfig::default();
        config.knowledge.max_results_cap = 3;
        let tools = build_tools(config, tmp.path());

        let body = tools
            .search_knowledge_base(Parameters(SearchKnowledgeBaseParams {
                query: "alpha".into(),
                max_results: Some(50),
            }))
            .await
            .unwrap();
        assert_eq!(parse(&body)["total"], 3);
    }

    #[tokio::test]
    async fn search_errors_carry_kind_and_class() {
        let tmp = corpus(1);
        let tools = build_tools(QuantMindConfig::default(), tmp.path());
        let err = tools
            .search_knowledge_base(Parameters(SearchKnowledgeBaseParams {
                query: "   ".into(),
                max_results: None,
            }))
            .await
            .unwrap_err();
        let json = parse(&err);
        assert_eq!(json["error"]["kind"], "invalid_query");
        assert_eq!(json["error"]["user_input"], true);

        let missing = build_tools(QuantMindConfig::default(), &tmp.path().join("absent"));
        let err = missing
            .search_knowledge_base(Parameters(SearchKnowledgeBaseParams {
                query: "alpha".into(),
                max_results: None,
            }))
            .await
            .unwrap_err();
        let json = parse(&err);
        assert_eq!(json["error"]["kind"], "directory_not_found");
        assert_eq!(json["error"]["user_input"], false);
    }

    #[tokio::test]
    async fn accepted_submission_has_flat_fields_and_no_thresholds() {
        let tmp = corpus(0);
        let tools = build_tools(QuantMindConfig::default(), tmp.path());

        let body = tools
            .submit_alpha_telemetry(submit_params(meanrev("meanrev_v1", 1.8)))
            .await
            .unwrap();
        let json = parse(&body);

        assert_eq!(json["accepted"], true);
        assert!(json["id"].is_string());
        assert!(json["quality_score"].as_f64().unwrap() > 0.0);
        assert!(json.get("failures").is_none());
        assert!(json.get("thresholds").is_none());
        assert!(json["message"].as_str().unwrap().contains("accepted"));
    }

    #[tokio::test]
    async fn rejection_lists_failures_and_thresholds() {
        let tmp = corpus(0);
        let tools = build_tools(QuantMindConfig::default(), tmp.path());

        let body = tools
            .submit_alpha_telemetry(submit_params(json!({
                "strategy_name": "bad_v1",
                "hypothesis": "",
                "code": "",
                "metrics": {
                    "sharpe_ratio": 0.9,
                    "total_trades": 40,
                    "max_drawdown": -0.45,
                    "win_rate": 0.30
                }
            })))
            .await
            .unwrap();
        let json = parse(&body);

        assert_eq!(json["accepted"], false);
        assert!(json.get("id").is_none());
        let failures = json["failures"].as_array().unwrap();
        assert_eq!(failures.len(), 4);
        assert_eq!(failures[0]["kind"], "below_threshold");
        assert_eq!(failures[0]["metric"], "sharpe_ratio");
        assert_eq!(json["thresholds"]["min_sharpe"], 1.5);
        assert_eq!(json["thresholds"]["min_win_rate"], 0.45);
    }

    #[tokio::test]
    async fn duplicate_is_a_rejection_not_an_error() {
        let tmp = corpus(0);
        let tools = build_tools(QuantMindConfig::default(), tmp.path());
        tools
            .submit_alpha_telemetry(submit_params(meanrev("meanrev_v1", 1.8)))
            .await
            .unwrap();

        let body = tools
            .submit_alpha_telemetry(submit_params(meanrev("meanrev_v1", 2.5)))
            .await
            .unwrap();
        let json = parse(&body);
        assert_eq!(json["accepted"], false);
        assert_eq!(json["failures"][0]["kind"], "duplicate_strategy_name");
    }

    #[tokio::test]
    async fn malformed_submission_is_an_error_and_stores_nothing() {
        let tmp = corpus(0);
        let tools = build_tools(QuantMindConfig::default(), tmp.path());

        let mut params = meanrev("loose", 1.8);
        params["metrics"]["sharpe_ratio"] = json!("high");
        let err = tools
            .submit_alpha_telemetry(submit_params(params))
            .await
            .unwrap_err();
        let json = parse(&err);
        assert_eq!(json["error"]["kind"], "malformed_input");
        assert_eq!(json["error"]["user_input"], true);

        let body = tools
            .list_top_strategies(Parameters(ListTopStrategiesParams { n: None }))
            .await
            .unwrap();
        assert_eq!(parse(&body)["total"], 0);
    }

    #[tokio::test]
    async fn list_top_and_get_strategy_round_trip() {
        let tmp = corpus(0);
        let tools = build_tools(QuantMindConfig::default(), tmp.path());
        for (name, sharpe) in [("low", 1.6), ("high", 3.0)] {
            tools
                .submit_alpha_telemetry(submit_params(meanrev(name, sharpe)))
                .await
                .unwrap();
        }

        let body = tools
            .list_top_strategies(Parameters(ListTopStrategiesParams { n: Some(1) }))
            .await
            .unwrap();
        let json = parse(&body);
        assert_eq!(json["total"], 1);
        assert_eq!(json["strategies"][0]["name"], "high");

        let id = json["strategies"][0]["id"].as_str().unwrap().to_string();
        let body = tools
            .get_strategy(Parameters(GetStrategyParams { id }))
            .await
            .unwrap();
        let strategy = parse(&body);
        assert_eq!(strategy["parameters"]["lookback"], 5);
        assert_eq!(strategy["metrics"]["sharpe_ratio"], 3.0);

        let err = tools
            .get_strategy(Parameters(GetStrategyParams { id: "nope".into() }))
            .await
            .unwrap_err();
        assert_eq!(parse(&err)["error"]["kind"], "not_found");
    }

    #[tokio::test]
    async fn zero_n_is_reported_as_malformed_input() {
        let tmp = corpus(0);
        let tools = build_tools(QuantMindConfig::default(), tmp.path());
        let err = tools
            .list_top_strategies(Parameters(ListTopStrategiesParams { n: Some(0) }))
            .await
            .unwrap_err();
        assert_eq!(parse(&err)["error"]["kind"], "malformed_input");
    }
}
