//! Sorter — stable ascending order by rank, unranked records last.

use cg_core::{FieldValue, Record};

/// Integer rank of a record.
///
/// Accepts `Int`, integral `Float`, and integer text. Anything else
/// (absent, fractional, unparsable) counts as unranked.
pub fn rank_of(record: &Record, key: &str) -> Option<i64> {
    match record.get(key)? {
        FieldValue::Int(i) => Some(*i),
        FieldValue::Float(x) if x.is_finite() && x.fract() == 0.0 => Some(*x as i64),
        FieldValue::Float(_) => None,
        FieldValue::Str(s) => s.trim().parse().ok(),
    }
}

/// Stable sort by `key` ascending; unranked records keep their relative
/// order after all ranked ones.
pub fn sort_by_rank(records: &mut [Record], key: &str) {
    records.sort_by_key(|r| {
        let rank = rank_of(r, key);
        (rank.is_none(), rank)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, rank: Option<FieldValue>) -> Record {
        let mut r = Record::new();
        r.insert("id", id);
        if let Some(v) = rank {
            r.insert("market_cap_rank", v);
        }
        r
    }

    fn ids(recs: &[Record]) -> Vec<String> {
        recs.iter().map(|r| r.get("id").unwrap().to_string()).collect()
    }

    #[test]
    fn ascending() {
        let mut recs = vec![
            coin("c", Some(FieldValue::Int(3))),
            coin("a", Some(FieldValue::Int(1))),
            coin("b", Some(FieldValue::Int(2))),
        ];
        sort_by_rank(&mut recs, "market_cap_rank");
        assert_eq!(ids(&recs), ["a", "b", "c"]);
    }

    #[test]
    fn unranked_last_and_stable() {
        let mut recs = vec![
            coin("u1", None),
            coin("r2", Some(FieldValue::Int(2))),
            coin("u2", Some(FieldValue::from("n/a"))),
            coin("r1a", Some(FieldValue::Int(1))),
            coin("r1b", Some(FieldValue::Float(1.0))),
            coin("u3", Some(FieldValue::Float(1.5))),
        ];
        sort_by_rank(&mut recs, "market_cap_rank");
        assert_eq!(ids(&recs), ["r1a", "r1b", "r2", "u1", "u2", "u3"]);
    }

    #[test]
    fn rank_parsing() {
        assert_eq!(rank_of(&coin("x", Some(FieldValue::from(" 7 "))), "market_cap_rank"), Some(7));
        assert_eq!(rank_of(&coin("x", Some(FieldValue::Float(4.0))), "market_cap_rank"), Some(4));
        assert_eq!(rank_of(&coin("x", Some(FieldValue::Float(f64::NAN))), "market_cap_rank"), None);
        assert_eq!(rank_of(&coin("x", None), "market_cap_rank"), None);
    }

    #[test]
    fn negative_and_zero_ranks_sort_first() {
        let mut recs = vec![
            coin("one", Some(FieldValue::Int(1))),
            coin("zero", Some(FieldValue::Int(0))),
        ];
        sort_by_rank(&mut recs, "market_cap_rank");
        assert_eq!(ids(&recs), ["zero", "one"]);
    }
}
