//! Date normalization and month arithmetic.
//!
//! Task data arrives from several producers, so a "date" may be a calendar
//! value, a number of epoch milliseconds, a free-form string, or a provider
//! timestamp object. Everything funnels through [`normalize`] into a single
//! canonical `NaiveDateTime` (UTC wall clock).

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::Value;

/// A provider timestamp (`{seconds, nanoseconds}`), as written by document stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTimestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl ProviderTimestamp {
    pub fn to_date(&self) -> Option<NaiveDateTime> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds).map(|dt| dt.naive_utc())
    }
}

/// Every temporal shape the timeline accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum TemporalValue {
    Date(NaiveDateTime),
    EpochMillis(f64),
    Text(String),
    Timestamp(ProviderTimestamp),
}

impl TemporalValue {
    /// Probe a JSON value for a temporal shape. `null` and unrecognized
    /// shapes yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(TemporalValue::EpochMillis),
            Value::String(s) => Some(TemporalValue::Text(s.clone())),
            Value::Object(map) => {
                // Firestore serializes as {seconds, nanoseconds}, its admin SDK as {_seconds, _nanoseconds}.
                let seconds = map.get("seconds").or_else(|| map.get("_seconds"));
                if let Some(seconds) = seconds.and_then(Value::as_i64) {
                    let nanoseconds = map
                        .get("nanoseconds")
                        .or_else(|| map.get("_nanoseconds"))
                        .and_then(Value::as_u64)
                        .unwrap_or(0)
                        .min(999_999_999) as u32;
                    return Some(TemporalValue::Timestamp(ProviderTimestamp {
                        seconds,
                        nanoseconds,
                    }));
                }
                // Extended JSON ({"$date": ...}) wraps any of the other shapes.
                map.get("$date").and_then(TemporalValue::from_json)
            }
            _ => None,
        }
    }
}

impl From<NaiveDateTime> for TemporalValue {
    fn from(value: NaiveDateTime) -> Self {
        TemporalValue::Date(value)
    }
}

impl From<NaiveDate> for TemporalValue {
    fn from(value: NaiveDate) -> Self {
        TemporalValue::Date(value.and_time(NaiveTime::MIN))
    }
}

/// Canonicalize a temporal value. Invalid or non-finite inputs become `None`.
pub fn normalize(value: Option<&TemporalValue>) -> Option<NaiveDateTime> {
    match value? {
        TemporalValue::Timestamp(ts) => ts.to_date(),
        TemporalValue::EpochMillis(ms) => from_epoch_millis(*ms),
        TemporalValue::Date(d) => Some(*d),
        TemporalValue::Text(s) => parse_text(s),
    }
}

/// Shorthand for `normalize(TemporalValue::from_json(value))`.
pub fn normalize_json(value: &Value) -> Option<NaiveDateTime> {
    normalize(TemporalValue::from_json(value).as_ref())
}

fn from_epoch_millis(ms: f64) -> Option<NaiveDateTime> {
    if !ms.is_finite() || ms.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64).map(|dt| dt.naive_utc())
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d",
];

fn parse_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    // Numeric strings are epoch milliseconds that went through a text field.
    if s.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return s.parse::<f64>().ok().and_then(from_epoch_millis);
    }
    None
}

// ── Month arithmetic ─────────────────────────────────────────────────────────

/// Whole calendar months from `a`'s month to `b`'s month.
pub fn months_between(a: NaiveDateTime, b: NaiveDateTime) -> i32 {
    (b.year() * 12 + b.month0() as i32) - (a.year() * 12 + a.month0() as i32)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Position of `date` inside its month, in `[0, 1)`.
pub fn day_fraction(date: NaiveDateTime) -> f64 {
    date.day0() as f64 / days_in_month(date.year(), date.month()) as f64
}

/// Shift by `delta` months, clamping the day to the target month's last day.
///
/// Jan 31 + 1 month is Feb 28 (or 29), and going back gives Jan 28, so the
/// round trip is only exact for days up to 28.
pub fn add_months(base: NaiveDateTime, delta: i32) -> NaiveDateTime {
    let total = i64::from(base.year()) * 12 + i64::from(base.month0()) + i64::from(delta);
    let Ok(year) = i32::try_from(total.div_euclid(12)) else {
        return base;
    };
    let month = total.rem_euclid(12) as u32 + 1;
    let day = base.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_nano_opt(base.hour(), base.minute(), base.second(), base.nanosecond()))
        .unwrap_or(base)
}

/// Whole days between the calendar dates of `a` and `b` (negative when `b` is earlier).
pub fn whole_days_between(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    (b.date() - a.date()).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn null_and_garbage_normalize_to_none() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize_json(&Value::Null), None);
        assert_eq!(normalize_json(&json!("not a date")), None);
        assert_eq!(normalize_json(&json!(true)), None);
        assert_eq!(normalize(Some(&TemporalValue::EpochMillis(f64::NAN))), None);
        assert_eq!(normalize(Some(&TemporalValue::EpochMillis(f64::INFINITY))), None);
    }

    #[test]
    fn epoch_millis_become_dates() {
        let d = normalize_json(&json!(1_700_000_000_000i64)).unwrap();
        assert_eq!(d.date(), NaiveDate::from_ymd_opt(2023, 11, 14).unwrap());
    }

    #[test]
    fn provider_timestamps_use_their_conversion() {
        let ts = ProviderTimestamp { seconds: 1_735_689_600, nanoseconds: 0 };
        let expected = ts.to_date().unwrap();
        assert_eq!(normalize(Some(&TemporalValue::Timestamp(ts))), Some(expected));
        assert_eq!(normalize_json(&json!({"seconds": 1_735_689_600, "nanoseconds": 0})), Some(expected));
        assert_eq!(normalize_json(&json!({"_seconds": 1_735_689_600})), Some(expected));
        assert_eq!(expected, ymd(2025, 1, 1));
    }

    #[test]
    fn strings_in_common_formats_parse() {
        assert_eq!(normalize_json(&json!("2025-03-04")), Some(ymd(2025, 3, 4)));
        assert_eq!(normalize_json(&json!("04/03/2025")), Some(ymd(2025, 3, 4)));
        assert_eq!(normalize_json(&json!("2025-03-04T00:00:00Z")), Some(ymd(2025, 3, 4)));
        assert_eq!(normalize_json(&json!({"$date": "2025-03-04"})), Some(ymd(2025, 3, 4)));
    }

    #[test]
    fn dates_pass_through() {
        let d = ymd(2024, 2, 29);
        assert_eq!(normalize(Some(&TemporalValue::from(d))), Some(d));
    }

    #[test]
    fn months_between_counts_calendar_months() {
        assert_eq!(months_between(ymd(2025, 1, 31), ymd(2025, 2, 1)), 1);
        assert_eq!(months_between(ymd(2025, 3, 1), ymd(2024, 12, 31)), -3);
        assert_eq!(months_between(ymd(2025, 1, 1), ymd(2027, 7, 1)), 30);
    }

    #[test]
    fn day_fraction_is_zero_on_the_first() {
        assert_eq!(day_fraction(ymd(2025, 4, 1)), 0.0);
        assert!((day_fraction(ymd(2025, 4, 16)) - 0.5).abs() < 1e-9);
        assert!(day_fraction(ymd(2025, 1, 31)) < 1.0);
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(add_months(ymd(2025, 1, 31), 1), ymd(2025, 2, 28));
        assert_eq!(add_months(ymd(2024, 1, 31), 1), ymd(2024, 2, 29));
        assert_eq!(add_months(ymd(2025, 1, 15), -13), ymd(2023, 12, 15));
    }

    #[test]
    fn add_months_preserves_time_of_day() {
        let base = ymd(2025, 5, 10).date().and_hms_opt(14, 30, 5).unwrap();
        assert_eq!(add_months(base, 3).time(), base.time());
    }

    #[test]
    fn add_months_round_trips_for_early_days() {
        for day in 1..=28 {
            let d = ymd(2025, 1, day);
            for k in -30..=30 {
                assert_eq!(add_months(add_months(d, k), -k), d, "day {day}, k {k}");
            }
        }
    }

    #[test]
    fn add_months_out_of_range_returns_base() {
        let base = ymd(2025, 1, 15);
        assert_eq!(add_months(base, i32::MAX), base);
        assert_eq!(add_months(base, i32::MIN), base);
    }

    #[test]
    fn whole_days_ignore_time_of_day() {
        let a = ymd(2025, 1, 3).date().and_hms_opt(23, 0, 0).unwrap();
        assert_eq!(whole_days_between(a, ymd(2025, 1, 5)), 2);
    }
}
