//! # cg-clean
//!
//! Record normalization for coin market snapshots.
//!
//! ## Architecture
//!
//! A single synchronous pass over an in-memory batch:
//!
//! ```text
//! raw ──► mapper ──► validator ──► normalizer ──► dedup ──► sorter ──► timestamper ──► clean
//!                       │              │             │
//!                       └──────────────┴─────────────┴──► DropObserver (dropped rows)
//! ```
//!
//! Each stage is a plain function over `Record`s so it can be tested on its
//! own; [`pipeline::Pipeline`] wires them together from a
//! [`CleaningConfig`](cg_core::config::CleaningConfig) and a
//! [`Clock`](cg_core::time_util::Clock).

pub mod dedup;
pub mod mapper;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod sorter;
pub mod timestamper;
pub mod validator;

pub use pipeline::{CleanOutput, CleanReport, Pipeline};
pub use report::{DropLog, DropObserver, DropReason, Stage};
