//! Field converters: total functions from a raw source [`Value`] to the typed
//! value stored in a document.
//!
//! None of these ever fail. Source data mixes plain text, base64-wrapped
//! binary and numbers-as-strings, so anything that cannot be understood
//! degrades to `None` (or empty text) and the row carries on.
//!
//! [`Value`]: model::core::value::Value

use chrono_tz::Tz;

pub mod date;
pub mod decimal;
pub mod optional;
pub mod text;

pub use date::{parse_date, parse_timestamp};
pub use decimal::parse_decimal;
pub use optional::normalize_optional;
pub use text::normalize_text;

/// Zone every parsed timestamp is normalized into.
pub const REFERENCE_TZ: Tz = chrono_tz::America::Sao_Paulo;
