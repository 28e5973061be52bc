//! Deduplicator — first occurrence of each key wins.

use cg_core::Record;
use cg_core::dedup::FirstSeen;

use crate::report::{DropObserver, DropReason, Stage};

/// Textual dedup key of a record; `None` when the key field is absent.
///
/// Numbers are compared through their rendered form, so `Int(1)` and
/// `Str("1")` collide.
pub fn dedup_key(record: &Record, key: &str) -> Option<String> {
    record.get(key).map(|v| v.to_string())
}

/// Drop every record whose key already appeared earlier in `records`.
///
/// Comparison is case-sensitive. Records without the key field all share
/// one "missing" key, so only the first of them is kept.
pub fn dedup_first(records: Vec<Record>, key: &str, observer: &mut dyn DropObserver) -> Vec<Record> {
    let mut seen: FirstSeen<Option<String>> = FirstSeen::new();
    records
        .into_iter()
        .filter(|rec| {
            let k = dedup_key(rec, key);
            if seen.check_and_insert(k.clone()) {
                true
            } else {
                let reason = DropReason::Duplicate {
                    key: k.unwrap_or_else(|| format!("<no {key}>")),
                };
                observer.on_drop(Stage::Dedup, rec, &reason);
                false
            }
        })
        .collect()
}
