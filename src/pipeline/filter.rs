//! The filter chain: text search, payment method and date range, applied conjunctively.

use crate::model::Record;
use chrono::{DateTime, Datelike, Duration, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Restricts records to a window relative to "now".
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
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// No date restriction.
    #[default]
    None,
    /// Same calendar day as now.
    Today,
    /// Within the last seven days (168 hours).
    Week,
    /// Same calendar month and year as now.
    Month,
    /// Same calendar year as now.
    Year,
}

serde_plain::derive_display_from_serialize!(DateRange);
serde_plain::derive_fromstr_from_deserialize!(DateRange);

/// The user-controlled filter settings. The default value matches every record.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free text, matched case-insensitively against id, name and service.
    pub query: String,
    /// Exact payment method to keep. Empty means any method.
    pub method: String,
    pub range: DateRange,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, method: impl Into<String>, range: DateRange) -> Self {
        Self {
            query: query.into(),
            method: method.into(),
            range,
        }
    }

    /// True when these criteria cannot exclude anything.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.method.is_empty() && self.range == DateRange::None
    }
}

/// Filters `records` against `criteria`, using the local clock for the date range.
pub fn apply(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    apply_at(records, criteria, Local::now())
}

/// Filters `records` against `criteria` with an explicit `now`. Calendar comparisons (`today`,
/// `month`, `year`) happen in `now`'s time zone.
pub fn apply_at<Tz>(records: &[Record], criteria: &FilterCriteria, now: DateTime<Tz>) -> Vec<Record>
where
    Tz: TimeZone,
{
    let needle = criteria.query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| matches_query(r, &needle))
        .filter(|r| matches_method(r, &criteria.method))
        .filter(|r| matches_range(r, criteria.range, &now))
        .cloned()
        .collect()
}

/// `needle` must already be trimmed and lowercased.
fn matches_query(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [Some(record.id()), record.name(), record.service()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

fn matches_method(record: &Record, method: &str) -> bool {
    method.is_empty() || record.method() == Some(method)
}

fn matches_range<Tz>(record: &Record, range: DateRange, now: &DateTime<Tz>) -> bool
where
    Tz: TimeZone,
{
    if range == DateRange::None {
        return true;
    }
    let Some(paid_at) = record.paid_at() else {
        return false;
    };
    let paid_at = paid_at.in_zone(&now.timezone());
    match range {
        DateRange::None => true,
        DateRange::Today => paid_at.date_naive() == now.date_naive(),
        DateRange::Week => paid_at >= now.clone() - Duration::days(7),
        DateRange::Month => paid_at.year() == now.year() && paid_at.month() == now.month(),
        DateRange::Year => paid_at.year() == now.year(),
    }
}
