use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::vault::score::ScoreWeights;
use crate::vault::validate::Thresholds;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct QuantMindConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub knowledge: KnowledgeConfig,
    pub vault: VaultConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub research_papers_path: String,
    pub extensions: Vec<String>,
    pub excerpt_chars: usize,
    pub default_max_results: usize,
    pub max_results_cap: usize,
    pub remove_stop_words: bool,
    pub normalize_by_length: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VaultConfig {
    pub min_sharpe: f64,
    pub min_trades: f64,
    pub min_drawdown: f64,
    pub min_win_rate: f64,
    pub default_top_n: usize,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringConfig {
    pub sharpe_weight: f64,
    pub drawdown_weight: f64,
    pub win_rate_weight: f64,
    pub sharpe_scale: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_quantmind_dir()
            .join("vault.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        let research_papers_path = default_quantmind_dir()
            .join("research_papers")
            .to_string_lossy()
            .into_owned();
        Self {
            research_papers_path,
            extensions: vec!["md".into(), "markdown".into(), "txt".into()],
            excerpt_chars: 500,
            default_max_results: 5,
            max_results_cap: 20,
            remove_stop_words: true,
            normalize_by_length: false,
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            min_sharpe: thresholds.min_sharpe,
            min_trades: thresholds.min_trades,
            min_drawdown: thresholds.min_drawdown,
            min_win_rate: thresholds.min_win_rate,
            default_top_n: 10,
            scoring: ScoringConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = ScoreWeights::default();
        Self {
            sharpe_weight: weights.sharpe,
            drawdown_weight: weights.drawdown,
            win_rate_weight: weights.win_rate,
            sharpe_scale: weights.sharpe_scale,
        }
    }
}

impl VaultConfig {
    /// Acceptance thresholds currently in effect.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_sharpe: self.min_sharpe,
            min_trades: self.min_trades,
            min_drawdown: self.min_drawdown,
            min_win_rate: self.min_win_rate,
        }
    }

    pub fn score_weights(&self) -> ScoreWeights {
        ScoreWeights {
            sharpe: self.scoring.sharpe_weight,
            drawdown: self.scoring.drawdown_weight,
            win_rate: self.scoring.win_rate_weight,
            sharpe_scale: self.scoring.sharpe_scale,
        }
    }
}

/// Returns `~/.quantmind/`, or `./.quantmind/` when no home directory is known.
pub fn default_quantmind_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".quantmind")
}

/// Returns the default config file path: `~/.quantmind/config.toml`
pub fn default_config_path() -> PathBuf {
    default_quantmind_dir().join("config.toml")
}

impl QuantMindConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            QuantMindConfig::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Each of the four acceptance thresholds can be overridden on its own.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("QUANTMIND_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("QUANTMIND_RESEARCH_PAPERS") {
            self.knowledge.research_papers_path = val;
        }
        if let Ok(val) = std::env::var("QUANTMIND_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Some(v) = env_f64("QUANTMIND_MIN_SHARPE")? {
            self.vault.min_sharpe = v;
        }
        if let Some(v) = env_f64("QUANTMIND_MIN_TRADES")? {
            self.vault.min_trades = v;
        }
        if let Some(v) = env_f64("QUANTMIND_MIN_DRAWDOWN")? {
            self.vault.min_drawdown = v;
        }
        if let Some(v) = env_f64("QUANTMIND_MIN_WIN_RATE")? {
            self.vault.min_win_rate = v;
        }
        Ok(())
    }

    /// Reject settings that would make search or scoring meaningless.
    pub fn validate(&self) -> Result<()> {
        let thresholds = self.vault.thresholds();
        for (key, value) in [
            ("vault.min_sharpe", thresholds.min_sharpe),
            ("vault.min_trades", thresholds.min_trades),
            ("vault.min_drawdown", thresholds.min_drawdown),
            ("vault.min_win_rate", thresholds.min_win_rate),
        ] {
            if !value.is_finite() {
                bail!("{key} must be a finite number, got {value}");
            }
        }
        // The Sharpe term is flat below zero, so accepted Sharpe values must not reach there
        if thresholds.min_sharpe < 0.0 {
            bail!("vault.min_sharpe must be non-negative, got {}", thresholds.min_sharpe);
        }

        let s = &self.vault.scoring;
        for (key, value) in [
            ("vault.scoring.sharpe_weight", s.sharpe_weight),
            ("vault.scoring.drawdown_weight", s.drawdown_weight),
            ("vault.scoring.win_rate_weight", s.win_rate_weight),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{key} must be a positive number, got {value}");
            }
        }
        if !s.sharpe_scale.is_finite() || s.sharpe_scale <= 0.0 {
            bail!("vault.scoring.sharpe_scale must be positive, got {}", s.sharpe_scale);
        }

        if self.knowledge.excerpt_chars == 0 {
            bail!("knowledge.excerpt_chars must be at least 1");
        }
        if self.knowledge.max_results_cap == 0 {
            bail!("knowledge.max_results_cap must be at least 1");
        }
        if self.knowledge.default_max_results == 0 {
            bail!("knowledge.default_max_results must be at least 1");
        }
        if self.vault.default_top_n == 0 {
            bail!("vault.default_top_n must be at least 1");
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Resolve the research-papers directory, expanding `~` if needed.
    pub fn resolved_research_path(&self) -> PathBuf {
        expand_tilde(&self.knowledge.research_papers_path)
    }
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(val) => {
            let parsed = val
                .trim()
                .parse::<f64>()
                .with_context(|| format!("{key} must be a number, got {val:?}"))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
