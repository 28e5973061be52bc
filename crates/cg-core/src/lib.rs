//! # cg-core
//!
//! Core crate for the coin market pipeline, providing:
//!
//! - **Types** (`types`) — the ordered [`Record`] model and canonical field names
//! - **Configuration** (`config`) — JSON config deserialization with defaults
//! - **Error types** (`error`) — domain-specific `CgError` via thiserror
//! - **Deduplication** (`dedup`) — first-seen key filter
//! - **Time utilities** (`time_util`) — injectable wall clock + formatting
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod dedup;
pub mod error;
pub mod logging;
pub mod time_util;
pub mod types;

// Re-export types at crate root for convenience.
pub use error::CgError;
pub use types::*;
