//! Value normalizer — symbol case, decimal rounding, integer coercion.
//!
//! Rules (each applies to the listed fields independently):
//!
//! | Rule      | Input          | Output                                    |
//! |-----------|----------------|-------------------------------------------|
//! | uppercase | `Str`          | ASCII uppercase                           |
//! | round     | `Float`        | half away from zero at `precision` digits |
//! | integer   | `Float`        | truncated toward zero, `Int`              |
//!
//! `Int` values are already integral and are left alone by both numeric
//! rules. Text in a numeric field passes through untouched; a non-finite
//! float in an integer field cannot be represented and is removed.

use cg_core::config::CleaningConfig;
use cg_core::{FieldValue, Record};
use tracing::warn;

/// Round half away from zero to `digits` decimals.
///
/// Values too large to carry a fraction at `digits` decimals (scaled
/// magnitude at or above 2^52, or overflowing) are returned unchanged.
#[inline]
pub fn round_to(v: f64, digits: u32) -> f64 {
    if !v.is_finite() {
        return v;
    }
    let factor = 10f64.powi(digits as i32);
    let scaled = v * factor;
    if !scaled.is_finite() || scaled.abs() >= 2f64.powi(52) {
        return v;
    }
    scaled.round() / factor
}

/// Truncate toward zero. `None` for NaN and infinities.
#[inline]
pub fn truncate_to_int(v: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds.
    v.is_finite().then(|| v.trunc() as i64)
}

/// Normalize one record in place according to `cfg`.
pub fn normalize(record: &mut Record, cfg: &CleaningConfig) {
    for field in &cfg.uppercase_fields {
        if let Some(FieldValue::Str(s)) = record.get_mut(field) {
            s.make_ascii_uppercase();
        }
    }

    for field in &cfg.round_fields {
        if let Some(FieldValue::Float(x)) = record.get_mut(field) {
            *x = round_to(*x, cfg.precision);
        }
    }

    for field in &cfg.integer_fields {
        let Some(FieldValue::Float(x)) = record.get(field) else {
            continue;
        };
        match truncate_to_int(*x) {
            Some(i) => {
                record.insert(field.as_str(), FieldValue::Int(i));
            }
            None => {
                warn!("{field} = {x} cannot be an integer, removing it");
                record.remove(field);
            }
        }
    }
}

/// Normalize every record in place.
pub fn normalize_all(records: &mut [Record], cfg: &CleaningConfig) {
    for rec in records.iter_mut() {
        normalize(rec, cfg);
    }
}
