//! Lenient parsing of the timestamp formats that admin backends commonly emit.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A point in time as the backend sent it.
///
/// Values with an offset (or epoch milliseconds) name one instant. Values without an offset, such
/// as `2024-01-01` or `2024-03-08 11:00:00`, are wall-clock readings: they only become an instant
/// once a time zone is chosen, and calendar questions ("is it today?") must be asked in that zone.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Timestamp {
    Instant(DateTime<Utc>),
    Local(NaiveDateTime),
}

impl Timestamp {
    /// This timestamp seen from `tz`. Wall-clock values keep their date and time of day.
    pub fn in_zone<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        match self {
            Timestamp::Instant(t) => t.with_timezone(tz),
            // A wall-clock time skipped by a DST jump is read as UTC wall time.
            Timestamp::Local(naive) => tz
                .from_local_datetime(naive)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(naive)),
        }
    }

    /// The instant, reading wall-clock values in the machine's local time zone.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Timestamp::Instant(t) => *t,
            Timestamp::Local(_) => self.in_zone(&Local).with_timezone(&Utc),
        }
    }

    /// The date and time of day as stored: UTC for instants, as sent for wall-clock values.
    pub fn wall_clock(&self) -> NaiveDateTime {
        match self {
            Timestamp::Instant(t) => t.naive_utc(),
            Timestamp::Local(naive) => *naive,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp::Instant(value)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Timestamp::Local(value)
    }
}

impl From<NaiveDate> for Timestamp {
    fn from(value: NaiveDate) -> Self {
        Timestamp::Local(value.and_time(NaiveTime::default()))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Timestamp::Instant(t) => t.serialize(serializer),
            Timestamp::Local(naive) => naive.serialize(serializer),
        }
    }
}

/// Parses a timestamp string. Accepts RFC 3339, naive date-times and bare dates. Values without an
/// offset are kept as wall-clock `Timestamp::Local`. Returns `None` when nothing matches.
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp::Instant(dt.with_timezone(&Utc)));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Timestamp::Local(naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(Timestamp::from)
}

/// Converts epoch milliseconds to a timestamp.
fn from_millis(ms: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(ms).map(Timestamp::Instant)
}

/// Deserializes an optional timestamp without ever failing. Strings are parsed with
/// `parse_timestamp`, integers are epoch milliseconds, and anything else becomes `None`.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_timestamp(&s),
        Some(Value::Number(n)) => n.as_i64().and_then(from_millis),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, Timelike};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .into()
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-06-01T10:30:00+05:30").unwrap();
        let Timestamp::Instant(dt) = ts else {
            panic!("expected an instant, got {ts:?}");
        };
        assert_eq!(dt.hour(), 5);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn test_parse_rfc3339_zulu_with_millis() {
        let dt = parse_timestamp("2024-01-01T08:15:00.000Z").unwrap().to_utc();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2024, 1, 1, 8));
    }

    #[test]
    fn test_parse_bare_date_is_local_midnight() {
        assert_eq!(parse_timestamp("2024-01-01"), Some(local(2024, 1, 1, 0, 0)));
    }

    #[test]
    fn test_parse_naive_datetime() {
        assert_eq!(
            parse_timestamp("2024-03-05 14:00:00"),
            Some(local(2024, 3, 5, 14, 0))
        );
        assert_eq!(
            parse_timestamp("2024-03-05T14:00"),
            Some(local(2024, 3, 5, 14, 0))
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_wall_clock_keeps_its_date_in_any_zone() {
        let ts = local(2024, 1, 1, 0, 0);
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let east = FixedOffset::east_opt(9 * 3600).unwrap();
        for seen in [ts.in_zone(&west).naive_local(), ts.in_zone(&east).naive_local()] {
            assert_eq!(seen, ts.wall_clock());
        }
    }

    #[test]
    fn test_instant_moves_with_the_zone() {
        let ts = parse_timestamp("2024-01-01T02:00:00Z").unwrap();
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let seen = ts.in_zone(&west);
        assert_eq!((seen.year(), seen.month(), seen.day()), (2023, 12, 31));
    }

    #[test]
    fn test_serialize_keeps_the_kind() {
        let instant = parse_timestamp("2024-01-01T09:30:00Z").unwrap();
        assert_eq!(
            serde_json::to_string(&instant).unwrap(),
            "\"2024-01-01T09:30:00Z\""
        );
        assert_eq!(
            serde_json::to_string(&local(2024, 1, 1, 0, 0)).unwrap(),
            "\"2024-01-01T00:00:00\""
        );
    }

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_lenient")]
        at: Option<Timestamp>,
    }

    #[test]
    fn test_deserialize_lenient_variants() {
        let h: Holder = serde_json::from_str(r#"{"at": 1704067200000}"#).unwrap();
        assert_eq!(
            h.at,
            Some(Timestamp::Instant(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            ))
        );

        let h: Holder = serde_json::from_str(r#"{"at": "not a date"}"#).unwrap();
        assert!(h.at.is_none());

        let h: Holder = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(h.at.is_none());

        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(h.at.is_none());
    }
}
