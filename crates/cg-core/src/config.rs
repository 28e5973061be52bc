//! Configuration parsing for the coin market pipeline.
//!
//! All settings come from a single optional JSON file. Every section and
//! every field has a default, so `{}` (or no file at all) reproduces the
//! reference run: top 30 coins by market cap from CoinGecko, cleaned, sent
//! to a local Kafka broker and saved as `cleaned_data.csv` / `.json`.
//!
//! # Example config
//!
//! ```json
//! {
//!   "meta":     { "module_name": "cg-runner", "log_path": "/tmp/log" },
//!   "source":   { "kind": "coingecko", "per_page": 50, "limit": 30 },
//!   "cleaning": { "precision": 2, "sort_key": "market_cap_rank" },
//!   "output":   { "dir": "out", "json_layout": "lines" },
//!   "broker":   { "bootstrap_servers": ["localhost:9092"], "topic": "coin_markets" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::CgError;
use crate::time_util::DEFAULT_TIMESTAMP_FORMAT;
use crate::types::fields;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Module metadata (name, log path).
    pub meta: ModuleMeta,
    /// Where raw market records come from.
    pub source: SourceConfig,
    /// Cleaning pipeline parameters.
    pub cleaning: CleaningConfig,
    /// File outputs.
    pub output: OutputConfig,
    /// Message broker output.
    pub broker: BrokerConfig,
}

impl AppConfig {
    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), CgError> {
        match self.source.kind.to_lowercase().as_str() {
            "coingecko" => {
                if self.source.per_page == 0 {
                    return Err(CgError::Config("source.per_page must be > 0".into()));
                }
            }
            "snapshot" => {
                if self.source.path.is_none() {
                    return Err(CgError::Config("snapshot source requires source.path".into()));
                }
            }
            other => return Err(CgError::Config(format!("unknown source kind: {other}"))),
        }

        let c = &self.cleaning;
        for (what, name) in [
            ("price_field", &c.price_field),
            ("dedup_key", &c.dedup_key),
            ("sort_key", &c.sort_key),
            ("timestamp_field", &c.timestamp_field),
        ] {
            if name.is_empty() {
                return Err(CgError::Config(format!("cleaning.{what} must not be empty")));
            }
        }
        if c.precision > MAX_PRECISION {
            return Err(CgError::Config(format!(
                "cleaning.precision {} exceeds {MAX_PRECISION}",
                c.precision
            )));
        }

        if self.broker.enabled {
            if self.broker.topic.is_empty() {
                return Err(CgError::Config("broker.topic must not be empty".into()));
            }
            if self.broker.bootstrap_servers.is_empty() {
                return Err(CgError::Config("broker.bootstrap_servers must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// Upper bound on rounding digits; beyond this `10^p` scaling loses the
/// integral part of typical prices.
pub const MAX_PRECISION: u32 = 10;

/// Module metadata block.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModuleMeta {
    pub module_name: String,
    pub log_path: Option<String>,
}

impl Default for ModuleMeta {
    fn default() -> Self {
        Self {
            module_name: "cg-runner".into(),
            log_path: None,
        }
    }
}

/// Market data source configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source identifier: `"coingecko"` or `"snapshot"`.
    pub kind: String,
    /// REST base URL.
    pub base_url: String,
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
    /// Keep only the first `limit` entries of the response.
    pub limit: usize,
    pub timeout_sec: u64,
    pub user_agent: String,
    /// JSON file for the `snapshot` source.
    pub path: Option<PathBuf>,
    /// Fields projected from each raw entry, in output order.
    pub fields: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: "coingecko".into(),
            base_url: "https://api.coingecko.com/api/v3".into(),
            vs_currency: "usd".into(),
            order: "market_cap_desc".into(),
            per_page: 50,
            page: 1,
            limit: 30,
            timeout_sec: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
            path: None,
            fields: fields::SOURCE_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Cleaning pipeline parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Source → canonical field renames, applied in file order.
    #[serde(deserialize_with = "ordered_pairs")]
    pub renames: Vec<(String, String)>,
    /// Field that must hold a positive number for a record to survive.
    pub price_field: String,
    /// String fields converted to ASCII uppercase.
    pub uppercase_fields: Vec<String>,
    /// Float fields rounded to `precision` decimals.
    pub round_fields: Vec<String>,
    pub precision: u32,
    /// Float fields truncated to integers.
    pub integer_fields: Vec<String>,
    /// Records sharing this field's value are duplicates; the first wins.
    pub dedup_key: String,
    /// Ascending sort field; records without it go last.
    pub sort_key: String,
    pub timestamp_field: String,
    pub timestamp_format: String,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            renames: vec![
                (fields::SRC_CURRENT_PRICE.into(), fields::PRICE_USD.into()),
                (fields::SRC_CHANGE_PCT_24H.into(), fields::CHANGE_24H_PERCENT.into()),
            ],
            price_field: fields::PRICE_USD.into(),
            uppercase_fields: vec![fields::SYMBOL.into()],
            round_fields: vec![
                fields::PRICE_USD.into(),
                fields::CHANGE_24H_PERCENT.into(),
                fields::PRICE_CHANGE_24H.into(),
            ],
            precision: 2,
            integer_fields: vec![fields::MARKET_CAP.into(), fields::TOTAL_VOLUME.into()],
            dedup_key: fields::SYMBOL.into(),
            sort_key: fields::MARKET_CAP_RANK.into(),
            timestamp_field: fields::SCRAPED_AT.into(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.into(),
        }
    }
}

/// Layout of the JSON output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonLayout {
    /// Pretty-printed array of objects.
    #[default]
    Array,
    /// One compact object per line.
    Lines,
}

/// File output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub csv_file: String,
    pub json_file: String,
    pub json_layout: JsonLayout,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            csv_file: "cleaned_data.csv".into(),
            json_file: "cleaned_data.json".into(),
            json_layout: JsonLayout::Array,
        }
    }
}

/// Broker acknowledgement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckMode {
    None,
    One,
    #[default]
    All,
}

/// Kafka producer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub enabled: bool,
    pub bootstrap_servers: Vec<String>,
    pub topic: String,
    pub client_id: String,
    pub ack_timeout_ms: u64,
    pub required_acks: AckMode,
    /// Record field used as the message key; `None` sends unkeyed messages.
    pub key_field: Option<String>,
    /// Number of leading messages echoed to the log.
    pub log_first: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bootstrap_servers: vec!["localhost:9092".into()],
            topic: "coin_markets".into(),
            client_id: "cg-runner".into(),
            ack_timeout_ms: 10_000,
            required_acks: AckMode::All,
            key_field: None,
            log_first: 3,
        }
    }
}

/// Deserialize a JSON object into `(key, value)` pairs, keeping file order.
fn ordered_pairs<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
    map.into_iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => Ok((k, s)),
            other => Err(serde::de::Error::custom(format!(
                "rename target for '{k}' must be a string, got {other}"
            ))),
        })
        .collect()
}

/// Load, parse and validate a JSON config file.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok(config)
}

/// Parse and validate config text.
pub fn parse_config(content: &str) -> Result<AppConfig, CgError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}
