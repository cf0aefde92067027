use super::{REFERENCE_TZ, text::normalize_text};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use model::core::value::Value;

const COMPACT_DATE: &str = "%Y%m%d";

/// Timestamp layouts, tried in order; first match wins.
const TIMESTAMP_LAYOUTS: &[Layout] = &[
    Layout::Date(COMPACT_DATE),
    Layout::DateTime("%Y-%m-%d %H:%M:%S"),
    Layout::Date("%Y-%m-%d"),
    Layout::Date("%d/%m/%Y"),
    Layout::DateTime("%d/%m/%Y %H:%M:%S"),
];

enum Layout {
    Date(&'static str),
    DateTime(&'static str),
}

impl Layout {
    fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        match self {
            Layout::Date(COMPACT_DATE) => parse_compact(s).and_then(|d| d.and_hms_opt(0, 0, 0)),
            Layout::Date(fmt) => NaiveDate::parse_from_str(s, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            Layout::DateTime(fmt) => NaiveDateTime::parse_from_str(s, fmt).ok(),
        }
    }
}

/// Parses a date with no time component from `YYYYMMDD` text.
///
/// Values that already are dates or timestamps keep their calendar date.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Null => None,
        Value::Date(d) => Some(*d),
        Value::Timestamp(ts) => Some(ts.date_naive()),
        other => normalize_text(other).and_then(|s| parse_compact(&s)),
    }
}

/// Parses a point in time and expresses it in the reference zone.
///
/// Text without an explicit zone is read as UTC, then converted.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Tz>> {
    match value {
        Value::Null => None,
        Value::Timestamp(ts) => Some(ts.with_timezone(&REFERENCE_TZ)),
        Value::Date(d) => d.and_hms_opt(0, 0, 0).map(localize),
        other => {
            let text = normalize_text(other)?;
            if text.is_empty() {
                return None;
            }
            TIMESTAMP_LAYOUTS
                .iter()
                .find_map(|layout| layout.parse(&text))
                .map(localize)
        }
    }
}

fn localize(naive: NaiveDateTime) -> DateTime<Tz> {
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).with_timezone(&REFERENCE_TZ)
}

// chrono's %Y accepts signs and short years; the compact layout must be
// exactly eight digits.
fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, COMPACT_DATE).ok()
}
