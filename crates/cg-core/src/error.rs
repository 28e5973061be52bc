//! Typed error definitions for the coin market pipeline.
//!
//! Provides [`CgError`] for domain-specific errors that are more informative
//! than plain `anyhow::Error` strings. All variants implement `std::error::Error`
//! via `thiserror`, so they integrate seamlessly with `anyhow::Result`.
//!
//! Per-record defects (a missing price, a duplicate symbol) are never errors;
//! they are filtered by the cleaning stages. Only structural problems and I/O
//! failures surface here.

use thiserror::Error;

/// Domain-specific errors for the coin market pipeline.
#[derive(Debug, Error)]
pub enum CgError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// Market data request or response error.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Input is not a sequence of mappings. Aborts the whole batch.
    #[error("malformed input: {0}")]
    Structure(String),

    /// CSV / JSON output error.
    #[error("sink error: {0}")]
    Sink(String),

    /// Broker connection or send error.
    #[error("publish error: {0}")]
    Publish(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
