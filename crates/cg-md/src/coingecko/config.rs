//! CoinGecko-specific configuration extraction.

use std::time::Duration;

use anyhow::{Result, anyhow};
use cg_core::config::SourceConfig;

/// Parsed CoinGecko configuration.
#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
    pub limit: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub fields: Vec<String>,
}

impl CoinGeckoConfig {
    pub fn from_source(src: &SourceConfig) -> Result<Self> {
        if src.per_page == 0 {
            return Err(anyhow!("coingecko per_page must be > 0"));
        }
        Ok(Self {
            base_url: src.base_url.trim_end_matches('/').to_string(),
            vs_currency: src.vs_currency.clone(),
            order: src.order.clone(),
            per_page: src.per_page,
            page: src.page.max(1),
            // Asking for more rows than one page holds cannot be satisfied.
            limit: src.limit.min(src.per_page as usize),
            timeout: Duration::from_secs(src.timeout_sec.max(1)),
            user_agent: src.user_agent.clone(),
            fields: src.fields.clone(),
        })
    }

    /// Full URL of the markets endpoint.
    pub fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.base_url)
    }

    /// Query string parameters for the markets endpoint.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("order", self.order.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("sparkline", "false".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_request() {
        let cfg = CoinGeckoConfig::from_source(&SourceConfig::default()).unwrap();
        assert_eq!(cfg.markets_url(), "https://api.coingecko.com/api/v3/coins/markets");
        assert_eq!(
            cfg.query(),
            vec![
                ("vs_currency", "usd".to_string()),
                ("order", "market_cap_desc".to_string()),
                ("per_page", "50".to_string()),
                ("page", "1".to_string()),
                ("sparkline", "false".to_string()),
            ]
        );
        assert_eq!(cfg.limit, 30);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn trailing_slash_and_limit_clamp() {
        let src = SourceConfig {
            base_url: "http://localhost:8080/api/".into(),
            per_page: 10,
            limit: 30,
            ..Default::default()
        };
        let cfg = CoinGeckoConfig::from_source(&src).unwrap();
        assert_eq!(cfg.markets_url(), "http://localhost:8080/api/coins/markets");
        assert_eq!(cfg.limit, 10);
    }

    #[test]
    fn zero_per_page_rejected() {
        let src = SourceConfig {
            per_page: 0,
            ..Default::default()
        };
        assert!(CoinGeckoConfig::from_source(&src).is_err());
    }
}
