//! Timestamper — stamps every record of a run with one processing time.

use cg_core::Record;
use cg_core::time_util::{Clock, format_timestamp};

/// Read `clock` once and format the result.
pub fn capture(clock: &dyn Clock, fmt: &str) -> String {
    format_timestamp(clock.now(), fmt)
}

/// Set `field` to `stamp` on every record, replacing any previous value.
pub fn stamp_all(records: &mut [Record], field: &str, stamp: &str) {
    for rec in records.iter_mut() {
        rec.insert(field, stamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cg_core::FieldValue;
    use cg_core::time_util::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn same_stamp_for_all() {
        let clock = FixedClock(
            NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        );
        let stamp = capture(&clock, "%Y-%m-%d %H:%M:%S");
        assert_eq!(stamp, "2025-03-01 08:00:00");

        let mut recs = vec![Record::new(), Record::new()];
        recs[1].insert("scraped_at", "old");
        stamp_all(&mut recs, "scraped_at", &stamp);
        for r in &recs {
            assert_eq!(r.get("scraped_at"), Some(&FieldValue::from("2025-03-01 08:00:00")));
        }
    }
}
