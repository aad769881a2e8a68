//! Id comparison rules.
//!
//! Ids arrive from the URL as strings while stored ids may be any JSON value.
//! Lookups use [`strict_eq`]; removal uses the coercive [`loose_eq`].

use std::borrow::Cow;

use serde_json::Value;

/// Canonical string form of an id: strings as-is, integral floats without
/// a fraction (`5.0` is `"5"`), booleans as `"true"`/`"false"`.
/// `null`, arrays and objects have none.
pub fn id_key(id: &Value) -> Option<Cow<'_, str>> {
    match id {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(render_number(n))),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// 2^53: past this f64 no longer holds every integer exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn render_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_INT => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// `id` rendered as a string equals `key` exactly.
pub fn strict_eq(id: &Value, key: &str) -> bool {
    id_key(id).as_deref() == Some(key)
}

/// Coercive equality between a stored id and a key taken from the URL.
///
/// Strings compare as strings. Numbers and booleans (as 1/0) compare
/// numerically against the key parsed as a number, so `5` matches `"5"`
/// and `"5.0"`. `null`, arrays and objects never match.
pub fn loose_eq(id: &Value, key: &str) -> bool {
    match id {
        Value::String(s) => s == key,
        Value::Number(n) => numeric_eq(n.as_f64(), parse_number(key)),
        Value::Bool(b) => numeric_eq(Some(if *b { 1.0 } else { 0.0 }), parse_number(key)),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn numeric_eq(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}
