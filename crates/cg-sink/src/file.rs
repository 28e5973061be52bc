//! File sink — persists a batch as CSV and as JSON.
//!
//! Both files hold the same rows in the same order. CSV columns are the
//! union of record fields in first-seen order; a record lacking a column
//! gets an empty cell.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use cg_core::config::{JsonLayout, OutputConfig};
use cg_core::types::fields::CANONICAL_COLUMNS;
use cg_core::{CgError, Record};
use tracing::info;

/// Column order for a batch. Falls back to the canonical columns when the
/// batch is empty so the CSV still carries a header.
pub fn columns(records: &[Record]) -> Vec<String> {
    if records.is_empty() {
        return CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect();
    }
    let mut cols: Vec<String> = Vec::new();
    for rec in records {
        for key in rec.keys() {
            if !cols.iter().any(|c| c == key) {
                cols.push(key.to_string());
            }
        }
    }
    cols
}

/// Write `records` as a CSV table with a header row.
pub fn write_csv(path: &Path, records: &[Record]) -> Result<(), CgError> {
    let sink_err = |e: csv::Error| CgError::Sink(format!("{}: {e}", path.display()));
    let mut wtr = csv::Writer::from_path(path).map_err(sink_err)?;

    let cols = columns(records);
    wtr.write_record(&cols).map_err(sink_err)?;
    for rec in records {
        let row = cols
            .iter()
            .map(|c| rec.get(c).map(|v| v.to_string()).unwrap_or_default());
        wtr.write_record(row).map_err(sink_err)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` as JSON in the given layout.
pub fn write_json(path: &Path, records: &[Record], layout: JsonLayout) -> Result<(), CgError> {
    let mut out = BufWriter::new(File::create(path)?);
    match layout {
        JsonLayout::Array => {
            serde_json::to_writer_pretty(&mut out, records)?;
            out.write_all(b"\n")?;
        }
        JsonLayout::Lines => {
            for rec in records {
                serde_json::to_writer(&mut out, rec)?;
                out.write_all(b"\n")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Paths written by [`FileSink::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Writes the CSV and JSON outputs into one directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    csv_file: String,
    json_file: String,
    layout: JsonLayout,
}

impl FileSink {
    pub fn from_config(cfg: &OutputConfig) -> Self {
        Self {
            dir: cfg.dir.clone(),
            csv_file: cfg.csv_file.clone(),
            json_file: cfg.json_file.clone(),
            layout: cfg.json_layout,
        }
    }

    /// Write both files, creating the output directory if needed.
    pub fn save(&self, records: &[Record]) -> Result<SavedFiles, CgError> {
        std::fs::create_dir_all(&self.dir)?;
        let saved = SavedFiles {
            csv: self.dir.join(&self.csv_file),
            json: self.dir.join(&self.json_file),
        };

        write_csv(&saved.csv, records)?;
        info!("saved {} record(s) to {}", records.len(), saved.csv.display());

        write_json(&saved.json, records, self.layout)?;
        info!("saved {} record(s) to {}", records.len(), saved.json.display());

        Ok(saved)
    }
}
