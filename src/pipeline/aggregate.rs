use crate::model::{Amount, Record};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Count and total over a collection of records.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub total: Amount,
}

/// Sum of the amounts in `records`. A record without an amount contributes zero.
pub fn total_amount(records: &[Record]) -> Decimal {
    records.iter().map(Record::amount_or_zero).sum()
}

/// The number of records.
pub fn count(records: &[Record]) -> usize {
    records.len()
}

pub fn summarize(records: &[Record]) -> Summary {
    Summary {
        count: count(records),
        total: Amount::new(total_amount(records)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::filter::{apply_at, DateRange, FilterCriteria};
    use chrono::{TimeZone, Utc};

    fn scenario() -> Vec<Record> {
        vec![
            Record::new("T1")
                .with_amount(Decimal::from(100))
                .with_method("UPI")
                .with_paid_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            Record::new("T2")
                .with_amount(Decimal::from(200))
                .with_method("Cash")
                .with_paid_at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
        ]
    }

    #[test]
    fn test_empty() {
        assert_eq!(total_amount(&[]), Decimal::ZERO);
        assert_eq!(count(&[]), 0);
    }

    #[test]
    fn test_missing_amount_counts_as_zero() {
        let mut records = scenario();
        records.push(Record::new("T3"));
        assert_eq!(total_amount(&records), Decimal::from(300));
        assert_eq!(count(&records), 3);
    }

    #[test]
    fn test_total_over_filtered_collection() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let criteria = FilterCriteria::new("", "UPI", DateRange::None);
        let filtered = apply_at(&scenario(), &criteria, now);
        let summary = summarize(&filtered);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total.value(), Decimal::from(100));
    }

    #[test]
    fn test_filtered_total_never_exceeds_raw_total() {
        let records = scenario();
        let raw = total_amount(&records);
        let now = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        for criteria in [
            FilterCriteria::default(),
            FilterCriteria::new("t2", "", DateRange::None),
            FilterCriteria::new("", "", DateRange::Week),
            FilterCriteria::new("", "Card", DateRange::None),
        ] {
            assert!(total_amount(&apply_at(&records, &criteria, now)) <= raw);
        }
    }
}
