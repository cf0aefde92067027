use bigdecimal::BigDecimal;
use model::core::value::Value;
use std::str::FromStr;

/// Parses a high-precision decimal.
///
/// Floats are rendered with exactly two fractional digits before parsing so
/// binary artifacts (`0.30000000000000004`) never reach the document.
pub fn parse_decimal(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Decimal(d) => Some(d.clone()),
        Value::String(s) => parse_literal(s),
        Value::Bytes(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_literal),
        Value::Float(f) if f.is_finite() => parse_literal(&format!("{f:.2}")),
        Value::Int(i) => Some(BigDecimal::from(*i)),
        Value::Uint(u) => Some(BigDecimal::from(*u)),
        _ => None,
    }
}

fn parse_literal(s: &str) -> Option<BigDecimal> {
    if s.is_empty() {
        return None;
    }
    BigDecimal::from_str(s).ok()
}
