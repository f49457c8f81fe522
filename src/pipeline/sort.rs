//! Ordering strategies for a filtered collection.

use crate::model::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The available orderings.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most recent payment first.
    #[default]
    Newest,
    /// Oldest payment first.
    Oldest,
    /// Largest amount first.
    AmountDesc,
    /// Smallest amount first.
    AmountAsc,
}

serde_plain::derive_display_from_serialize!(SortKey);
serde_plain::derive_fromstr_from_deserialize!(SortKey);

impl SortKey {
    /// Compares two records under this key. A missing timestamp orders before any present one and
    /// a missing amount orders as zero.
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Newest => instant(b).cmp(&instant(a)),
            SortKey::Oldest => instant(a).cmp(&instant(b)),
            SortKey::AmountDesc => b.amount_or_zero().cmp(&a.amount_or_zero()),
            SortKey::AmountAsc => a.amount_or_zero().cmp(&b.amount_or_zero()),
        }
    }
}

fn instant(record: &Record) -> Option<DateTime<Utc>> {
    record.paid_at().map(|t| t.to_utc())
}

/// Returns a new, ordered copy of `records`. The sort is stable, so records with equal keys keep
/// their input order.
pub fn sort(records: &[Record], key: SortKey) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn record(id: &str, amount: Option<i64>, day: Option<u32>) -> Record {
        let mut r = Record::new(id);
        if let Some(amount) = amount {
            r = r.with_amount(Decimal::from(amount));
        }
        if let Some(day) = day {
            r = r.with_paid_at(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap());
        }
        r
    }

    fn sample() -> Vec<Record> {
        vec![
            record("A", Some(300), Some(5)),
            record("B", Some(100), Some(20)),
            record("C", None, None),
            record("D", Some(100), Some(1)),
            record("E", Some(-50), Some(12)),
        ]
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_newest() {
        assert_eq!(
            ids(&sort(&sample(), SortKey::Newest)),
            vec!["B", "E", "A", "D", "C"]
        );
    }

    #[test]
    fn test_oldest() {
        assert_eq!(
            ids(&sort(&sample(), SortKey::Oldest)),
            vec!["C", "D", "A", "E", "B"]
        );
    }

    #[test]
    fn test_amount_desc_is_stable_on_ties() {
        // B and D both have 100; B comes first in the input.
        assert_eq!(
            ids(&sort(&sample(), SortKey::AmountDesc)),
            vec!["A", "B", "D", "C", "E"]
        );
    }

    #[test]
    fn test_amount_asc_treats_missing_as_zero() {
        assert_eq!(
            ids(&sort(&sample(), SortKey::AmountAsc)),
            vec!["E", "C", "B", "D", "A"]
        );
    }

    #[test]
    fn test_amount_desc_scenario() {
        let records = vec![record("T1", Some(100), Some(1)), record("T2", Some(200), Some(2))];
        assert_eq!(ids(&sort(&records, SortKey::AmountDesc)), vec!["T2", "T1"]);
    }

    #[test]
    fn test_wall_clock_and_instant_dates_sort_together() {
        let local = Record::new("L").with_paid_at(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        let records = vec![local, record("A", None, Some(5)), record("B", None, Some(20))];
        assert_eq!(ids(&sort(&records, SortKey::Oldest)), vec!["A", "L", "B"]);
        assert_eq!(ids(&sort(&records, SortKey::Newest)), vec!["B", "L", "A"]);
    }

    #[test]
    fn test_sort_is_a_permutation_and_idempotent() {
        let records = sample();
        for key in [
            SortKey::Newest,
            SortKey::Oldest,
            SortKey::AmountDesc,
            SortKey::AmountAsc,
        ] {
            let once = sort(&records, key);
            assert_eq!(once.len(), records.len());
            let mut a = ids(&once);
            let mut b = ids(&records);
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b, "{key} changed the set of records");
            assert_eq!(sort(&once, key), once, "{key} is not idempotent");
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = sample();
        let before = records.clone();
        let _ = sort(&records, SortKey::AmountAsc);
        assert_eq!(records, before);
    }

    #[test]
    fn test_sort_key_names() {
        assert_eq!(SortKey::AmountDesc.to_string(), "amount-desc");
        assert_eq!("amount-asc".parse::<SortKey>().unwrap(), SortKey::AmountAsc);
    }
}
