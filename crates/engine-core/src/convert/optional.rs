use bigdecimal::Zero;
use model::core::value::Value;

/// Drops sentinel "not provided" values.
///
/// Only the exact sentinels count: empty text, the text `"0"`, and numeric
/// zero. `"00"` or `"0.0"` are real values and pass through. Binary input is
/// turned into text first.
pub fn normalize_optional(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => text_or_absent(s.clone()),
        Value::Bytes(bytes) => text_or_absent(String::from_utf8_lossy(bytes).into_owned()),
        Value::Int(0) | Value::Uint(0) => None,
        Value::Float(f) if *f == 0.0 => None,
        Value::Decimal(d) if d.is_zero() => None,
        other => Some(other.clone()),
    }
}

fn text_or_absent(s: String) -> Option<Value> {
    if s.is_empty() || s == "0" {
        None
    } else {
        Some(Value::String(s))
    }
}
