use chrono::{NaiveDate, NaiveDateTime};
use model::core::value::Value;
use mysql_async::Value as MySqlValue;

/// Maps a binary-protocol MySQL value onto the raw source value.
///
/// Character and decimal columns arrive as bytes and stay bytes; the field
/// converters decide how to read them. Zero dates (`0000-00-00`) become null.
pub fn from_mysql(value: MySqlValue) -> Value {
    match value {
        MySqlValue::NULL => Value::Null,
        MySqlValue::Bytes(bytes) => Value::Bytes(bytes),
        MySqlValue::Int(i) => Value::Int(i),
        MySqlValue::UInt(u) => Value::Uint(u),
        MySqlValue::Float(f) => Value::Float(f as f64),
        MySqlValue::Double(d) => Value::Float(d),
        MySqlValue::Date(year, month, day, hour, minute, second, micros) => {
            datetime(year, month, day, hour, minute, second, micros)
                .map(|naive| Value::Timestamp(naive.and_utc()))
                .unwrap_or(Value::Null)
        }
        MySqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            Value::String(format_time(negative, days, hours, minutes, seconds, micros))
        }
    }
}

fn datetime(
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    micros: u32,
) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year.into(), month.into(), day.into())?.and_hms_micro_opt(
        hour.into(),
        minute.into(),
        second.into(),
        micros,
    )
}

// TIME spans -838:59:59 to 838:59:59, so it is kept as text.
fn format_time(negative: bool, days: u32, hours: u8, minutes: u8, seconds: u8, micros: u32) -> String {
    let sign = if negative { "-" } else { "" };
    let total_hours = days * 24 + u32::from(hours);
    if micros == 0 {
        format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn scalars_keep_their_kind() {
        assert_eq!(from_mysql(MySqlValue::NULL), Value::Null);
        assert_eq!(from_mysql(MySqlValue::Int(-3)), Value::Int(-3));
        assert_eq!(from_mysql(MySqlValue::UInt(3)), Value::Uint(3));
        assert_eq!(from_mysql(MySqlValue::Double(1.5)), Value::Float(1.5));
        assert_eq!(from_mysql(MySqlValue::Float(0.5)), Value::Float(0.5));
        assert_eq!(
            from_mysql(MySqlValue::Bytes(b"12.50".to_vec())),
            Value::Bytes(b"12.50".to_vec())
        );
    }

    #[test]
    fn dates_become_utc_timestamps() {
        let value = from_mysql(MySqlValue::Date(2024, 1, 15, 13, 45, 10, 0));
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 13, 45, 10).unwrap();
        assert_eq!(value, Value::Timestamp(expected));
    }

    #[test]
    fn zero_date_is_null() {
        assert_eq!(from_mysql(MySqlValue::Date(0, 0, 0, 0, 0, 0, 0)), Value::Null);
    }

    #[test]
    fn time_is_rendered_as_text() {
        assert_eq!(
            from_mysql(MySqlValue::Time(false, 0, 8, 5, 9, 0)),
            Value::from("08:05:09")
        );
        assert_eq!(
            from_mysql(MySqlValue::Time(true, 1, 2, 0, 0, 250)),
            Value::from("-26:00:00.000250")
        );
    }
}
