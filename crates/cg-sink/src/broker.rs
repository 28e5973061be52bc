//! Broker sink — publishes each record as one JSON message.
//!
//! Sends are attempted once per record, in batch order. A failed send is
//! logged and counted but does not stop later sends, and earlier messages
//! are never retracted.
//!
//! ```text
//! [Record, Record, ...] ──► serde_json ──► Publisher::send ──► topic
//! ```

use std::time::Duration;

use cg_core::config::{AckMode, BrokerConfig};
use cg_core::types::fields;
use cg_core::{CgError, Record};
use kafka::producer::{Producer, Record as KafkaRecord, RequiredAcks};
use tracing::{info, warn};

/// A topic-bound message producer.
pub trait Publisher {
    /// Destination topic.
    fn topic(&self) -> &str;
    /// Send one message and wait for the broker's acknowledgement.
    fn send(&mut self, payload: &[u8], key: Option<&[u8]>) -> Result<(), CgError>;
    /// Push out anything still buffered.
    fn flush(&mut self) -> Result<(), CgError>;
}

/// Kafka producer bound to one topic.
pub struct KafkaPublisher {
    producer: Producer,
    topic: String,
}

impl KafkaPublisher {
    /// Connect to the bootstrap servers and load topic metadata.
    pub fn connect(cfg: &BrokerConfig) -> Result<Self, CgError> {
        info!("connecting to Kafka at {:?}", cfg.bootstrap_servers);
        let acks = match cfg.required_acks {
            AckMode::None => RequiredAcks::None,
            AckMode::One => RequiredAcks::One,
            AckMode::All => RequiredAcks::All,
        };
        let producer = Producer::from_hosts(cfg.bootstrap_servers.clone())
            .with_client_id(cfg.client_id.clone())
            .with_ack_timeout(Duration::from_millis(cfg.ack_timeout_ms))
            .with_required_acks(acks)
            .create()
            .map_err(|e| CgError::Publish(format!("cannot connect to {:?}: {e}", cfg.bootstrap_servers)))?;
        Ok(Self {
            producer,
            topic: cfg.topic.clone(),
        })
    }
}

impl Publisher for KafkaPublisher {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn send(&mut self, payload: &[u8], key: Option<&[u8]>) -> Result<(), CgError> {
        let res = match key {
            Some(k) => self
                .producer
                .send(&KafkaRecord::from_key_value(&self.topic, k, payload)),
            None => self.producer.send(&KafkaRecord::from_value(&self.topic, payload)),
        };
        res.map_err(|e| CgError::Publish(format!("send to {} failed: {e}", self.topic)))
    }

    fn flush(&mut self) -> Result<(), CgError> {
        // Sends are synchronous; nothing is buffered client-side.
        Ok(())
    }
}

/// Outcome of [`publish_records`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
}

impl PublishReport {
    pub fn all_sent(&self) -> bool {
        self.failed == 0 && self.sent == self.attempted
    }
}

/// Publish every record as its own JSON message, in order.
///
/// `key_field` selects the message key (unkeyed when `None` or when the
/// record lacks the field). The first `log_first` successful sends are
/// echoed at info level.
pub fn publish_records(
    publisher: &mut dyn Publisher,
    records: &[Record],
    key_field: Option<&str>,
    log_first: usize,
) -> PublishReport {
    let mut report = PublishReport::default();
    info!("producing {} message(s) to topic: {}", records.len(), publisher.topic());

    for rec in records {
        report.attempted += 1;
        let payload = match serde_json::to_vec(rec) {
            Ok(p) => p,
            Err(e) => {
                warn!("cannot serialize record {}: {e}", report.attempted);
                report.failed += 1;
                continue;
            }
        };
        let key = key_field
            .and_then(|f| rec.get(f))
            .map(|v| v.to_string().into_bytes());

        match publisher.send(&payload, key.as_deref()) {
            Ok(()) => {
                report.sent += 1;
                if report.sent <= log_first {
                    info!(
                        "sent message {}: {} - ${}",
                        report.sent,
                        display_field(rec, fields::SYMBOL),
                        display_field(rec, fields::PRICE_USD),
                    );
                }
            }
            Err(e) => {
                warn!("message {} not sent: {e}", report.attempted);
                report.failed += 1;
            }
        }
    }

    if let Err(e) = publisher.flush() {
        warn!("flush failed: {e}");
    }
    info!(
        "sent {}/{} message(s) to topic: {}",
        report.sent,
        report.attempted,
        publisher.topic()
    );
    report
}

fn display_field(rec: &Record, name: &str) -> String {
    rec.get(name).map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}
