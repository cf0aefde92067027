use base64::{Engine, engine::general_purpose::STANDARD};
use model::core::value::Value;

/// Normalizes a raw value into text.
///
/// Binary input is first tried as base64; the decoded bytes win when they are
/// valid UTF-8, otherwise the raw bytes are used if they are UTF-8, otherwise
/// the result is empty text. Carriage returns and line feeds are removed and
/// surrounding whitespace trimmed. Null stays absent.
pub fn normalize_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bytes(bytes) => Some(clean(&bytes_to_text(bytes))),
        Value::String(s) => Some(clean(s)),
        other => other.as_string().map(|s| clean(&s)),
    }
}

fn bytes_to_text(bytes: &[u8]) -> String {
    if let Ok(decoded) = STANDARD.decode(bytes)
        && let Ok(text) = String::from_utf8(decoded)
    {
        return text;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::new(),
    }
}

fn clean(s: &str) -> String {
    s.replace(['\r', '\n'], "").trim().to_string()
}
