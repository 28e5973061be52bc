//! Pipeline driver — runs every cleaning stage over one batch.
//!
//! [`Pipeline`] owns the cleaning parameters and the clock. A run is a
//! single synchronous pass; per-record defects are dropped and reported,
//! and only a structurally malformed payload (see [`Pipeline::run_json`])
//! fails the batch.

use std::sync::Arc;

use cg_core::config::CleaningConfig;
use cg_core::time_util::{Clock, SystemClock};
use cg_core::{CgError, Record, json_objects};
use serde_json::Value;
use tracing::{debug, info};

use crate::report::{DropLog, DropObserver, DropReason, Stage};
use crate::{dedup, mapper, normalizer, sorter, timestamper, validator};

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    /// Records received.
    pub input: usize,
    /// Dropped for a missing, non-numeric or non-positive price (including
    /// prices that rounded to zero).
    pub invalid: usize,
    /// Dropped as repeats of an earlier dedup key.
    pub duplicates: usize,
    /// Records emitted.
    pub output: usize,
    /// Processing timestamp written to every emitted record.
    pub scraped_at: String,
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub records: Vec<Record>,
    pub report: CleanReport,
}

/// The record normalization pipeline.
pub struct Pipeline {
    config: CleaningConfig,
    clock: Arc<dyn Clock>,
}

impl Pipeline {
    pub fn new(config: CleaningConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Pipeline reading the local wall clock.
    pub fn with_system_clock(config: CleaningConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Run over a batch of raw records, logging each drop at debug level.
    pub fn run(&self, records: Vec<Record>) -> CleanOutput {
        let mut log_drop = |stage: Stage, rec: &Record, reason: &DropReason| {
            let id = rec.get("id").map(|v| v.to_string()).unwrap_or_default();
            debug!("[{stage}] dropped '{id}': {reason}");
        };
        self.run_with(records, &mut log_drop)
    }

    /// Run over a batch of raw records, reporting drops to `observer`.
    pub fn run_with(&self, mut records: Vec<Record>, observer: &mut dyn DropObserver) -> CleanOutput {
        let cfg = &self.config;
        let input = records.len();
        let mut tally = Tally {
            inner: observer,
            log: DropLog::default(),
        };

        let renamed = mapper::map_all(&mut records, &cfg.renames);
        info!("renamed {renamed} field(s) across {input} record(s)");

        let records = validator::retain_valid(records, &cfg.price_field, Stage::Validate, &mut tally);
        info!("removed {} record(s) with invalid {}", tally.log.count(Stage::Validate), cfg.price_field);

        let mut records = records;
        normalizer::normalize_all(&mut records, cfg);
        // Rounding can turn a tiny positive price into zero.
        let records = validator::retain_valid(records, &cfg.price_field, Stage::Normalize, &mut tally);
        info!(
            "normalized values (precision={}, {} rounded to zero)",
            cfg.precision,
            tally.log.count(Stage::Normalize)
        );

        let mut records = dedup::dedup_first(records, &cfg.dedup_key, &mut tally);
        info!("removed {} duplicate(s) by {}", tally.log.count(Stage::Dedup), cfg.dedup_key);

        sorter::sort_by_rank(&mut records, &cfg.sort_key);
        info!("sorted by {}", cfg.sort_key);

        let scraped_at = timestamper::capture(self.clock.as_ref(), &cfg.timestamp_format);
        timestamper::stamp_all(&mut records, &cfg.timestamp_field, &scraped_at);
        info!("stamped {}={scraped_at}", cfg.timestamp_field);

        let report = CleanReport {
            input,
            invalid: tally.log.count(Stage::Validate) + tally.log.count(Stage::Normalize),
            duplicates: tally.log.count(Stage::Dedup),
            output: records.len(),
            scraped_at,
        };
        info!("cleaned dataset contains {} record(s)", report.output);
        CleanOutput { records, report }
    }

    /// Run over a raw JSON payload.
    ///
    /// Fails with [`CgError::Structure`] unless `payload` is an array of
    /// objects; nothing is processed in that case.
    pub fn run_json(&self, payload: &Value) -> Result<CleanOutput, CgError> {
        let records = json_objects(payload, usize::MAX)?
            .into_iter()
            .map(Record::from_object)
            .collect();
        Ok(self.run(records))
    }
}

/// Forwards drops to the caller's observer while keeping counts.
struct Tally<'a> {
    inner: &'a mut dyn DropObserver,
    log: DropLog,
}

impl DropObserver for Tally<'_> {
    fn on_drop(&mut self, stage: Stage, record: &Record, reason: &DropReason) {
        self.log.on_drop(stage, record, reason);
        self.inner.on_drop(stage, record, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_core::FieldValue;
    use cg_core::time_util::FixedClock;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fixed_pipeline() -> Pipeline {
        let at = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Pipeline::new(CleaningConfig::default(), Arc::new(FixedClock(at)))
    }

    #[test]
    fn reference_example() {
        let payload = json!([
            {"id": "bitcoin", "symbol": "btc", "current_price": 43521.451,
             "market_cap_rank": 1, "market_cap": 851234567890.4},
            {"id": "bitcoin2", "symbol": "BTC", "current_price": -5, "market_cap_rank": 2}
        ]);
        let out = fixed_pipeline().run_json(&payload).unwrap();
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.get("symbol"), Some(&FieldValue::from("BTC")));
        assert_eq!(r.get("price_usd"), Some(&FieldValue::Float(43521.45)));
        assert_eq!(r.get("market_cap"), Some(&FieldValue::Int(851234567890)));
        assert_eq!(r.get("scraped_at"), Some(&FieldValue::from("2024-05-17 09:30:00")));
        assert!(!r.contains("current_price"));
        assert_eq!(out.report.invalid, 1);
        assert_eq!(out.report.duplicates, 0);
    }

    #[test]
    fn missing_price_is_dropped_not_fatal() {
        let payload = json!([
            {"id": "a", "symbol": "a", "market_cap_rank": 1},
            {"id": "b", "symbol": "b", "current_price": 2.0, "market_cap_rank": 2}
        ]);
        let out = fixed_pipeline().run_json(&payload).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].get("id"), Some(&FieldValue::from("b")));
    }

    #[test]
    fn empty_input_empty_output() {
        let out = fixed_pipeline().run(Vec::new());
        assert!(out.records.is_empty());
        assert_eq!(out.report.input, 0);
        assert_eq!(out.report.output, 0);
    }

    #[test]
    fn structural_errors_abort() {
        let p = fixed_pipeline();
        assert!(matches!(p.run_json(&json!({"id": "a"})), Err(CgError::Structure(_))));
        assert!(matches!(p.run_json(&json!([{"id": "a"}, "b"])), Err(CgError::Structure(_))));
    }

    #[test]
    fn n_valid_records_all_survive_with_one_stamp() {
        let payload: Vec<Value> = (0..30)
            .map(|i| {
                json!({"id": format!("coin{i}"), "symbol": format!("c{i}"),
                       "current_price": 1.0 + i as f64, "market_cap_rank": 30 - i})
            })
            .collect();
        let out = fixed_pipeline().run_json(&Value::Array(payload)).unwrap();
        assert_eq!(out.records.len(), 30);
        assert!(
            out.records
                .iter()
                .all(|r| r.get("scraped_at") == Some(&FieldValue::from("2024-05-17 09:30:00")))
        );
        // Reverse rank order in, ascending out.
        assert_eq!(out.records[0].get("id"), Some(&FieldValue::from("coin29")));
    }

    #[test]
    fn duplicate_survivor_is_first_valid_occurrence() {
        let recs = vec![
            json!({"id": "bad", "symbol": "eth", "current_price": 0, "market_cap_rank": 2}),
            json!({"id": "first", "symbol": "eth", "current_price": 2300.0, "market_cap_rank": 2}),
            json!({"id": "second", "symbol": "ETH", "current_price": 2301.0, "market_cap_rank": 1}),
        ];
        let out = fixed_pipeline().run_json(&Value::Array(recs)).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].get("id"), Some(&FieldValue::from("first")));
        assert_eq!(out.report.invalid, 1);
        assert_eq!(out.report.duplicates, 1);
    }

    #[test]
    fn price_rounding_to_zero_is_dropped() {
        let payload = json!([{"id": "dust", "symbol": "dust", "current_price": 0.001}]);
        let mut log = DropLog::default();
        let records = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|v| Record::from_json(v).unwrap())
            .collect();
        let out = fixed_pipeline().run_with(records, &mut log);
        assert!(out.records.is_empty());
        assert_eq!(log.count(Stage::Normalize), 1);
        assert_eq!(out.report.invalid, 1);
    }

    #[test]
    fn huge_values_survive_rounding() {
        let payload = json!([
            {"id": "big", "symbol": "big", "current_price": 1e307},
            {"id": "swing", "symbol": "swing", "current_price": 1.0, "price_change_24h": 1e307}
        ]);
        let mut log = DropLog::default();
        let records = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|v| Record::from_json(v).unwrap())
            .collect();
        let out = fixed_pipeline().run_with(records, &mut log);
        assert_eq!(log.total(), 0);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].get("price_usd"), Some(&FieldValue::Float(1e307)));
        assert_eq!(out.records[1].get("price_change_24h"), Some(&FieldValue::Float(1e307)));
        let json = serde_json::to_string(&out.records).unwrap();
        assert!(!json.contains("null"));
    }

    #[test]
    fn observer_sees_every_drop() {
        let payload = json!([
            {"id": "a", "symbol": "x", "current_price": 1.0},
            {"id": "b", "symbol": "x", "current_price": 1.0},
            {"id": "c", "symbol": "y"}
        ]);
        let records: Vec<Record> = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|v| Record::from_json(v).unwrap())
            .collect();
        let mut seen = Vec::new();
        let mut obs = |stage: Stage, rec: &Record, _: &DropReason| {
            seen.push((stage, rec.get("id").unwrap().to_string()));
        };
        fixed_pipeline().run_with(records, &mut obs);
        assert_eq!(seen, vec![(Stage::Validate, "c".to_string()), (Stage::Dedup, "b".to_string())]);
    }

    #[test]
    fn rerunning_on_clean_output_changes_nothing_numeric() {
        let payload = json!([
            {"id": "a", "symbol": "aa", "current_price": 1.23456, "price_change_24h": -0.005,
             "price_change_percentage_24h": 12.345, "market_cap": 1000.9, "market_cap_rank": 1}
        ]);
        let p = fixed_pipeline();
        let once = p.run_json(&payload).unwrap().records;
        let twice = p.run(once.clone()).records;
        assert_eq!(once, twice);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn raw_record() -> impl Strategy<Value = (String, Option<f64>, Option<i64>)> {
            (
                "[a-cA-C]{1,2}",
                prop_oneof![
                    Just(None),
                    (-50.0f64..50_000.0).prop_map(Some),
                    (0.0f64..0.01).prop_map(Some),
                ],
                prop_oneof![Just(None), (0i64..20).prop_map(Some)],
            )
        }

        fn build(rows: &[(String, Option<f64>, Option<i64>)]) -> Vec<Record> {
            rows.iter()
                .enumerate()
                .map(|(i, (sym, price, rank))| {
                    let mut r = Record::new();
                    r.insert("id", FieldValue::Int(i as i64));
                    r.insert("symbol", sym.as_str());
                    if let Some(p) = price {
                        r.insert("current_price", FieldValue::Float(*p));
                    }
                    if let Some(k) = rank {
                        r.insert("market_cap_rank", FieldValue::Int(*k));
                    }
                    r
                })
                .collect()
        }

        proptest! {
            #[test]
            fn output_invariants(rows in prop::collection::vec(raw_record(), 0..40)) {
                let out = fixed_pipeline().run(build(&rows)).records;

                // Positive prices only.
                for r in &out {
                    let p = r.get("price_usd").and_then(FieldValue::as_f64).unwrap();
                    prop_assert!(p > 0.0);
                }

                // Unique symbols, each the first surviving occurrence.
                let mut syms: Vec<String> = Vec::new();
                for r in &out {
                    let sym = r.get("symbol").unwrap().to_string();
                    prop_assert!(!syms.contains(&sym));
                    prop_assert_eq!(sym.to_ascii_uppercase(), sym.clone());
                    let id = r.get("id").and_then(FieldValue::as_i64).unwrap() as usize;
                    let first = rows.iter().position(|(s, p, _)| {
                        s.to_ascii_uppercase() == sym
                            && p.map_or(false, |p| normalizer::round_to(p, 2) > 0.0)
                    });
                    prop_assert_eq!(first, Some(id));
                    syms.push(sym);
                }

                // Ascending rank, unranked last, stable on ties.
                let keys: Vec<(bool, Option<i64>, i64)> = out
                    .iter()
                    .map(|r| {
                        let rank = sorter::rank_of(r, "market_cap_rank");
                        (rank.is_none(), rank, r.get("id").and_then(FieldValue::as_i64).unwrap())
                    })
                    .collect();
                for w in keys.windows(2) {
                    prop_assert!(w[0] <= w[1]);
                }
            }

            #[test]
            fn normalizing_twice_is_a_no_op(rows in prop::collection::vec(raw_record(), 0..20)) {
                let cfg = CleaningConfig::default();
                let mut once = build(&rows);
                mapper::map_all(&mut once, &cfg.renames);
                normalizer::normalize_all(&mut once, &cfg);
                let mut twice = once.clone();
                normalizer::normalize_all(&mut twice, &cfg);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn uppercase_is_total(sym in "[a-zA-Z0-9]{0,8}") {
                let cfg = CleaningConfig::default();
                let mut r = Record::new();
                r.insert("symbol", sym.as_str());
                normalizer::normalize(&mut r, &cfg);
                prop_assert_eq!(r.get("symbol"), Some(&FieldValue::Str(sym.to_ascii_uppercase())));
            }
        }
    }
}
