//! # cg-md
//!
//! Market data sources for the coin market pipeline.
//!
//! ## Architecture
//!
//! Each source turns some upstream payload into a flat list of raw
//! [`Record`]s with source-side field names. Nothing here renames, filters
//! or rounds; that is the job of `cg-clean`.
//!
//! - [`coingecko`] — CoinGecko `/coins/markets` REST endpoint
//! - [`snapshot`] — the same payload replayed from a local JSON file
//! - [`json_util`] — payload shape checks and JSON → record conversion
//! - [`registry`] — factory selecting a source from config

pub mod coingecko;
pub mod json_util;
pub mod registry;
pub mod snapshot;

use anyhow::Result;
use async_trait::async_trait;
use cg_core::Record;

/// Trait implemented by all market data sources.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;
    /// Fetch one batch of raw records.
    async fn fetch(&self) -> Result<Vec<Record>>;
}
