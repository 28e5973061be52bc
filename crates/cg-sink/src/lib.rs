//! # cg-sink
//!
//! Output collaborators for cleaned market records.
//!
//! - [`file`] — CSV table + JSON document, both holding the same rows
//! - [`broker`] — one JSON message per record to a Kafka topic
//!
//! Sinks only see the final, ordered batch; they never alter it.

pub mod broker;
pub mod file;

pub use broker::{KafkaPublisher, PublishReport, Publisher, publish_records};
pub use file::{FileSink, SavedFiles};
