//! # cg-runner
//!
//! Main entry point for the coin market pipeline.
//!
//! One run: fetch a market snapshot, clean it, publish every row to Kafka,
//! then save the cleaned batch as CSV and JSON.
//!
//! # Usage
//!
//! ```bash
//! cg-runner                              # reference defaults
//! cg-runner config.json --log-level debug
//! cg-runner --no-publish --out-dir out/
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use cg_clean::{CleanOutput, Pipeline};
use cg_core::Record;
use cg_core::config::{AppConfig, BrokerConfig, load_config};
use cg_core::logging::{LogFormat, init_logging};
use cg_sink::{FileSink, KafkaPublisher, publish_records};
use clap::Parser;
use tracing::{error, info, warn};

/// Coin market snapshot pipeline runner.
#[derive(Parser)]
#[command(name = "cg-runner", about = "Fetch, clean and publish coin market snapshots")]
struct Cli {
    /// Configuration file path (JSON). Built-in defaults apply when omitted.
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output (overrides `meta.log_path`).
    #[arg(long)]
    log_dir: Option<String>,

    /// Emit console logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Skip the Kafka step.
    #[arg(long)]
    no_publish: bool,

    /// Output directory (overrides `output.dir`).
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut config = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(dir) = cli.out_dir {
        config.output.dir = dir;
    }
    if cli.no_publish {
        config.broker.enabled = false;
    }

    // 2. Initialize logging
    let log_dir = cli.log_dir.or_else(|| config.meta.log_path.clone());
    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Pretty };
    init_logging(&cli.log_level, log_dir.as_deref(), &config.meta.module_name, format);

    info!(
        "cg-runner starting — config={}, source={}, log_level={}",
        cli.config.as_ref().map_or("<defaults>".into(), |p| p.display().to_string()),
        config.source.kind,
        cli.log_level,
    );

    // 3. Fetch
    let source = cg_md::registry::create_source(&config.source)?;
    let raw = source
        .fetch()
        .await
        .with_context(|| format!("fetch from {} failed", source.name()))?;
    if raw.is_empty() {
        error!("[{}] returned no records", source.name());
        bail!("no data fetched from {}", source.name());
    }
    info!("fetched {} row(s) from {}", raw.len(), source.name());
    info!("columns: {:?}", cg_sink::file::columns(&raw));

    // 4. Clean
    let pipeline = Pipeline::with_system_clock(config.cleaning.clone());
    let CleanOutput { records, report } = pipeline.run(raw);
    let records = Arc::new(records);

    // 5. Publish
    let published = if config.broker.enabled {
        publish(config.broker.clone(), Arc::clone(&records)).await
    } else {
        info!("publishing disabled");
        true
    };

    // 6. Save
    let saved = FileSink::from_config(&config.output).save(&records)?;

    info!(
        "{} — {} in, {} invalid, {} duplicate(s), {} out",
        if published { "pipeline completed successfully" } else { "pipeline completed with warnings" },
        report.input,
        report.invalid,
        report.duplicates,
        report.output,
    );
    if config.broker.enabled {
        info!("kafka topic: {}", config.broker.topic);
    }
    info!("output files: {}, {}", saved.csv.display(), saved.json.display());
    Ok(())
}

/// Publish on a blocking thread; the Kafka client is synchronous.
///
/// Returns `false` if the broker was unreachable or any send failed.
async fn publish(cfg: BrokerConfig, records: Arc<Vec<Record>>) -> bool {
    let servers = cfg.bootstrap_servers.clone();
    let task = tokio::task::spawn_blocking(move || {
        let mut publisher = KafkaPublisher::connect(&cfg)?;
        Ok::<_, cg_core::CgError>(publish_records(
            &mut publisher,
            &records,
            cfg.key_field.as_deref(),
            cfg.log_first,
        ))
    });

    match task.await {
        Ok(Ok(report)) => {
            if !report.all_sent() {
                warn!("{} of {} message(s) failed", report.failed, report.attempted);
            }
            report.all_sent()
        }
        Ok(Err(e)) => {
            error!("error producing to Kafka: {e}");
            warn!("make sure a broker is reachable at {servers:?}");
            false
        }
        Err(e) => {
            error!("publisher task failed: {e}");
            false
        }
    }
}
