//! The alpha vault: a gated, append-only store of validated trading strategies.
//!
//! - [`types`]: typed submissions and accepted records
//! - [`validate`]: the threshold gate
//! - [`score`]: the ranking score
//! - [`store`]: submission, lookup, and ranking over SQLite
//! - [`stats`]: aggregate figures

pub mod score;
pub mod stats;
pub mod store;
pub mod types;
pub mod validate;
