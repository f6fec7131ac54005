use anyhow::Result;

use crate::config::QuantMindConfig;
use crate::knowledge::KnowledgeBase;

/// Run a knowledge-base search from the terminal.
pub fn search(config: &QuantMindConfig, query: &str, max_results: Option<usize>) -> Result<()> {
    let knowledge = KnowledgeBase::from_config(config.resolved_research_path(), &config.knowledge);
    let max_results = max_results.unwrap_or(config.knowledge.default_max_results);

    let hits = knowledge.search(query, max_results)?;

    if hits.is_empty() {
        println!("No results found for '{query}'.");
        return Ok(());
    }

    println!("Found {} result(s) for '{query}'\n", hits.len());

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "  {}. {} [{}] (score: {:.4})",
            i + 1,
            hit.title,
            hit.source_path,
            hit.score,
        );
        println!("     {}", hit.excerpt);
        println!();
    }

    Ok(())
}
