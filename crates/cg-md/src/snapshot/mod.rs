//! Snapshot source — replays a saved `/coins/markets` payload from disk.
//!
//! Useful for offline runs and for re-cleaning a capture without hitting the
//! public API's rate limits.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use cg_core::Record;
use cg_core::config::SourceConfig;
use tracing::info;

use crate::json_util;

/// Reads raw market records from a JSON file.
pub struct SnapshotSource {
    path: PathBuf,
    limit: usize,
    fields: Vec<String>,
}

impl SnapshotSource {
    pub fn new(src: &SourceConfig) -> Result<Self> {
        let path = src
            .path
            .clone()
            .ok_or_else(|| anyhow!("snapshot source requires a path"))?;
        Ok(Self {
            path,
            limit: src.limit,
            fields: src.fields.clone(),
        })
    }
}

#[async_trait]
impl crate::MarketSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn fetch(&self) -> Result<Vec<Record>> {
        info!("[snapshot] reading {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("cannot read snapshot {}", self.path.display()))?;
        let body: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("snapshot {} is not JSON", self.path.display()))?;
        Ok(json_util::records_from_json(&body, self.limit, &self.fields)?)
    }
}
