//! Row validator — keeps records whose price is a positive number.
//!
//! Failing records are dropped, never raised: a missing or bad price is a
//! per-record defect, not a batch failure.

use cg_core::Record;

use crate::report::{DropObserver, DropReason, Stage};

/// Check that `field` is present, numeric, finite and `> 0`.
///
/// Returns the price on success so callers can log it.
pub fn price_check(record: &Record, field: &str) -> Result<f64, DropReason> {
    let value = record
        .get(field)
        .ok_or_else(|| DropReason::MissingField(field.to_string()))?;
    let price = value
        .as_f64()
        .filter(|p| !p.is_nan())
        .ok_or_else(|| DropReason::NonNumeric(field.to_string()))?;
    if price > 0.0 && price.is_finite() {
        Ok(price)
    } else {
        Err(DropReason::NonPositive {
            field: field.to_string(),
            value: price,
        })
    }
}

/// Predicate form of [`price_check`].
#[inline]
pub fn is_valid(record: &Record, field: &str) -> bool {
    price_check(record, field).is_ok()
}

/// Keep records passing [`price_check`], reporting the rest to `observer`
/// under `stage`. Order is preserved.
pub fn retain_valid(
    records: Vec<Record>,
    field: &str,
    stage: Stage,
    observer: &mut dyn DropObserver,
) -> Vec<Record> {
    records
        .into_iter()
        .filter(|rec| match price_check(rec, field) {
            Ok(_) => true,
            Err(reason) => {
                observer.on_drop(stage, rec, &reason);
                false
            }
        })
        .collect()
}
