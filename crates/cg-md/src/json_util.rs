//! JSON payload helpers shared by all sources.
//!
//! Market payloads are a JSON array of flat objects. This module checks that
//! shape (anything else is a fatal, batch-level error) and projects each
//! object onto the configured field list.

use cg_core::types::fields;
use cg_core::{CgError, FieldValue, Record, json_objects};
use serde_json::Value;
use tracing::debug;

/// Source fields that may arrive as JSON strings but hold numbers.
const NUMERIC_SOURCE_FIELDS: [&str; 7] = [
    fields::SRC_CURRENT_PRICE,
    fields::MARKET_CAP,
    fields::MARKET_CAP_RANK,
    fields::TOTAL_VOLUME,
    fields::PRICE_CHANGE_24H,
    fields::SRC_CHANGE_PCT_24H,
    fields::CIRCULATING_SUPPLY,
];

/// Convert a numeric string to `Int` when it is integral text, else `Float`.
fn coerce_numeric_str(s: &str) -> Option<FieldValue> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(FieldValue::Int(i));
    }
    fast_float2::parse(s).ok().map(FieldValue::Float)
}

/// Convert one raw field. Numeric strings in known numeric fields become
/// numbers; anything unparsable is kept as text for the cleaning stages to
/// reject.
fn convert_field(name: &str, v: &Value) -> Option<FieldValue> {
    let fv = FieldValue::from_json(v)?;
    if let FieldValue::Str(s) = &fv {
        if NUMERIC_SOURCE_FIELDS.contains(&name) {
            if let Some(n) = coerce_numeric_str(s) {
                return Some(n);
            }
        }
    }
    Some(fv)
}

/// Project one JSON object onto `wanted` (all scalar fields if empty).
///
/// Absent and `null` fields stay absent. Non-scalar values are skipped.
pub fn project_entry(obj: &serde_json::Map<String, Value>, wanted: &[String]) -> Record {
    let mut rec = Record::with_capacity(wanted.len().max(obj.len().min(16)));
    let mut take = |name: &str, v: &Value| match convert_field(name, v) {
        Some(fv) => {
            rec.insert(name, fv);
        }
        None if !v.is_null() => debug!("skipping non-scalar field '{name}'"),
        None => {}
    };

    if wanted.is_empty() {
        for (name, v) in obj {
            take(name.as_str(), v);
        }
    } else {
        for name in wanted {
            if let Some(v) = obj.get(name) {
                take(name.as_str(), v);
            }
        }
    }
    rec
}

/// Convert a market payload into raw records.
///
/// Returns [`CgError::Structure`] if `payload` is not an array or any of the
/// first `limit` elements is not an object.
pub fn records_from_json(payload: &Value, limit: usize, wanted: &[String]) -> Result<Vec<Record>, CgError> {
    let objects = json_objects(payload, limit)?;
    Ok(objects.into_iter().map(|obj| project_entry(obj, wanted)).collect())
}
