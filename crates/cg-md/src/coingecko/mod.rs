//! CoinGecko market data source.
//!
//! One REST call per run:
//!
//! | Operation   | Method | Path              |
//! |-------------|--------|-------------------|
//! | Market list | GET    | `/coins/markets`  |
//!
//! The response is a JSON array ordered by `order` (market cap descending by
//! default). Only the first `limit` entries are kept.

pub mod config;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cg_core::Record;
use cg_core::config::SourceConfig;
use tracing::{debug, info};

use self::config::CoinGeckoConfig;
use crate::json_util;

/// CoinGecko `/coins/markets` client.
pub struct CoinGeckoSource {
    /// Shared HTTP client (timeout + user agent preset).
    http: reqwest::Client,
    config: CoinGeckoConfig,
}

impl CoinGeckoSource {
    /// Create a new source (no request is sent yet).
    pub fn new(src: &SourceConfig) -> Result<Self> {
        let config = CoinGeckoConfig::from_source(src)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl crate::MarketSource for CoinGeckoSource {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        let url = self.config.markets_url();
        info!("[coingecko] GET {url} (per_page={}, page={})", self.config.per_page, self.config.page);

        let resp = self
            .http
            .get(&url)
            .query(&self.config.query())
            .send()
            .await
            .context("markets request failed")?;

        let body: serde_json::Value = resp
            .error_for_status()
            .context("markets HTTP error")?
            .json()
            .await
            .context("markets response is not JSON")?;

        let records = json_util::records_from_json(&body, self.config.limit, &self.config.fields)?;
        debug!(
            "[coingecko] payload had {} entries, kept {}",
            body.as_array().map_or(0, |a| a.len()),
            records.len()
        );
        Ok(records)
    }
}
