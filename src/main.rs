use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use quantmind::{cli, config, server};

#[derive(Parser)]
#[command(name = "quantmind", version, about = "Quant research MCP server for AI agents")]
struct Cli {
    /// Config file (defaults to ~/.quantmind/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport)
    Serve,
    /// Search the research-paper knowledge base
    Search {
        query: String,
        /// Maximum number of results
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
    },
    /// Validate and store a strategy from a JSON file
    Submit { file: PathBuf },
    /// List the best accepted strategies
    Top {
        #[arg(short = 'n', long)]
        n: Option<usize>,
    },
    /// Show one accepted strategy in full
    Inspect { id: String },
    /// Show vault statistics
    Stats,
    /// Check database and research directory health
    Doctor,
    /// Export all accepted strategies as JSON
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load config (for log level)
    let config = match &args.config {
        Some(path) => config::QuantMindConfig::load_from(path)?,
        None => config::QuantMindConfig::load()?,
    };

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Serve => server::serve_stdio(config).await?,
        Command::Search { query, max_results } => cli::search::search(&config, &query, max_results)?,
        Command::Submit { file } => cli::submit::submit(&config, &file)?,
        Command::Top { n } => cli::top::top(&config, n)?,
        Command::Inspect { id } => cli::inspect::inspect(&config, &id)?,
        Command::Stats => cli::stats::stats(&config)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Export => cli::export::export(&config)?,
    }

    Ok(())
}
