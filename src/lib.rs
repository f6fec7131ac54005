//! Quant research tools for AI agents, served over MCP.
//!
//! QuantMind is an [MCP](https://modelcontextprotocol.io/) server with two jobs:
//!
//! | Tool | Component | What it does |
//! |------|-----------|--------------|
//! | `search_knowledge_base` | [`knowledge`] | Ranks research papers by keyword relevance and returns bounded excerpts |
//! | `submit_alpha_telemetry` | [`vault`] | Validates backtest metrics against fixed thresholds and stores qualifying strategies |
//! | `list_top_strategies` | [`vault`] | Ranks accepted strategies by quality score |
//! | `get_strategy` | [`vault`] | Fetches an accepted strategy by ID |
//!
//! Default acceptance thresholds:
//!
//! | Metric | Minimum |
//! |--------|---------|
//! | `sharpe_ratio` | 1.5 |
//! | `total_trades` | 100 |
//! | `max_drawdown` | -0.30 |
//! | `win_rate` | 0.45 |
//!
//! # Architecture
//!
//! - **Storage**: SQLite, one append-only `strategies` table
//! - **Search**: linear term-frequency scan of a markdown/text directory, re-read per call
//! - **Transport**: MCP over stdio
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, migrations, and health checks
//! - [`error`] — Error taxonomy for the core components
//! - [`knowledge`] — Research-paper scan and keyword search
//! - [`vault`] — Submission validation, quality scoring, and persistence
//! - [`tools`] — MCP tool handler
//! - [`server`] — stdio server bootstrap
//! - [`cli`] — Operator subcommands

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod knowledge;
pub mod server;
pub mod tools;
pub mod vault;
