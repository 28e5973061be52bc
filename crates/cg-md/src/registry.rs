//! Source registry — factory for creating market sources from config.

use anyhow::{Result, anyhow};
use cg_core::config::SourceConfig;

use crate::{MarketSource, coingecko::CoinGeckoSource, snapshot::SnapshotSource};

/// Create a `MarketSource` based on the `kind` field in the config.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn MarketSource>> {
    match config.kind.to_lowercase().as_str() {
        "coingecko" => Ok(Box::new(CoinGeckoSource::new(config)?)),
        "snapshot" => Ok(Box::new(SnapshotSource::new(config)?)),
        other => Err(anyhow!("Unknown source kind: {other}")),
    }
}
