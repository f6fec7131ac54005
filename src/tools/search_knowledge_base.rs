//! MCP `search_knowledge_base` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `search_knowledge_base` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchKnowledgeBaseParams {
    /// Free-text query, e.g. `"momentum strategy"` or `"mean reversion"`.
    #[schemars(
        description = "Search query (e.g. 'momentum strategy', 'mean reversion', 'volatility trading')"
    )]
    pub query: String,

    /// Maximum number of papers to return. Defaults to 5.
    #[schemars(description = "Maximum number of results to return (at least 1). Defaults to 5.")]
    pub max_results: Option<usize>,
}
