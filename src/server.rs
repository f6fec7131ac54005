//! MCP server initialization for the stdio transport.
//!
//! [`serve_stdio`] wires the database, the knowledge base, and the MCP tool handler
//! into a running server.

use crate::config::QuantMindConfig;
use crate::db;
use crate::knowledge::KnowledgeBase;
use crate::tools::QuantMindTools;
use crate::vault::score::SCORE_VERSION;
use anyhow::Result;
use rmcp::ServiceExt;
use std::sync::{Arc, Mutex};

/// Shared setup: open DB, check score version, point the knowledge base at its directory.
fn setup_shared_state(
    config: QuantMindConfig,
) -> Result<(
    Arc<Mutex<rusqlite::Connection>>,
    Arc<KnowledgeBase>,
    Arc<QuantMindConfig>,
)> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    // Scores from another formula are not comparable with new ones
    if let Ok(Some(stored)) = db::migrations::get_score_version(&conn) {
        if stored != SCORE_VERSION {
            tracing::warn!(
                stored = %stored,
                current = SCORE_VERSION,
                "quality score formula changed; rankings mix old and new scores"
            );
        }
    }

    let research_path = config.resolved_research_path();
    if !research_path.is_dir() {
        tracing::warn!(
            path = %research_path.display(),
            "research papers directory not found; search_knowledge_base will fail until it exists"
        );
    }
    let knowledge = Arc::new(KnowledgeBase::from_config(research_path, &config.knowledge));

    Ok((Arc::new(Mutex::new(conn)), knowledge, Arc::new(config)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: QuantMindConfig) -> Result<()> {
    tracing::info!("starting QuantMind MCP server on stdio");

    let (db, knowledge, config) = setup_shared_state(config)?;

    let tools = QuantMindTools::new(db, knowledge, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running — waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}
