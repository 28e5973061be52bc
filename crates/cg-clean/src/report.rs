//! Dropped-record reporting.
//!
//! Stages never log or count on their own behalf; they hand every dropped
//! record to a [`DropObserver`]. Any `FnMut(Stage, &Record, &DropReason)`
//! closure is an observer, and [`DropLog`] keeps a tally for the run summary.

use std::fmt;

use cg_core::Record;

/// Stage that dropped a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validate,
    /// Price re-check after rounding (a tiny positive price can round to 0).
    Normalize,
    Dedup,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Normalize => "normalize",
            Self::Dedup => "dedup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a record was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    MissingField(String),
    NonNumeric(String),
    NonPositive { field: String, value: f64 },
    Duplicate { key: String },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing {field}"),
            Self::NonNumeric(field) => write!(f, "{field} is not numeric"),
            Self::NonPositive { field, value } => write!(f, "{field} = {value} is not positive"),
            Self::Duplicate { key } => write!(f, "duplicate key {key}"),
        }
    }
}

/// Receives every record a stage drops.
pub trait DropObserver {
    fn on_drop(&mut self, stage: Stage, record: &Record, reason: &DropReason);
}

impl<F> DropObserver for F
where
    F: FnMut(Stage, &Record, &DropReason),
{
    fn on_drop(&mut self, stage: Stage, record: &Record, reason: &DropReason) {
        self(stage, record, reason)
    }
}

/// Observer that keeps every `(stage, reason)` pair.
#[derive(Debug, Default, Clone)]
pub struct DropLog {
    pub entries: Vec<(Stage, DropReason)>,
}

impl DropLog {
    pub fn count(&self, stage: Stage) -> usize {
        self.entries.iter().filter(|(s, _)| *s == stage).count()
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }
}

impl DropObserver for DropLog {
    fn on_drop(&mut self, stage: Stage, _record: &Record, reason: &DropReason) {
        self.entries.push((stage, reason.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_is_observer() {
        let mut n = 0;
        {
            let mut obs = |_: Stage, _: &Record, _: &DropReason| n += 1;
            obs.on_drop(Stage::Dedup, &Record::new(), &DropReason::Duplicate { key: "BTC".into() });
        }
        assert_eq!(n, 1);
    }

    #[test]
    fn drop_log_counts_by_stage() {
        let mut log = DropLog::default();
        let rec = Record::new();
        log.on_drop(Stage::Validate, &rec, &DropReason::MissingField("price_usd".into()));
        log.on_drop(Stage::Dedup, &rec, &DropReason::Duplicate { key: "BTC".into() });
        log.on_drop(Stage::Dedup, &rec, &DropReason::Duplicate { key: "ETH".into() });
        assert_eq!(log.count(Stage::Validate), 1);
        assert_eq!(log.count(Stage::Dedup), 2);
        assert_eq!(log.count(Stage::Normalize), 0);
        assert_eq!(log.total(), 3);
    }

    #[test]
    fn reason_display() {
        let r = DropReason::NonPositive {
            field: "price_usd".into(),
            value: -5.0,
        };
        assert_eq!(r.to_string(), "price_usd = -5 is not positive");
    }
}
