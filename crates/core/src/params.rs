//! Helpers for reading typed field parameters out of a `serde_json::Value`.
//!
//! Parameters are best-effort overrides of compile-time defaults: a missing
//! key or a value of the wrong type yields the default, and numeric values
//! are clamped into the range where the simulation stays stable. None of
//! these helpers fail.

use serde_json::{json, Value};

/// Extracts an `f64` from `params[name]`, returning `default` if missing,
/// the wrong type, or non-finite.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Like [`param_f64`], then clamped to `[min, max]`.
pub fn param_f64_in(params: &Value, name: &str, default: f64, min: f64, max: f64) -> f64 {
    param_f64(params, name, default).clamp(min, max)
}

/// Extracts a `usize` from a non-negative integer value, clamped to `max`.
pub fn param_usize(params: &Value, name: &str, default: usize, max: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| usize::try_from(v).unwrap_or(usize::MAX))
        .unwrap_or(default)
        .min(max)
}

/// Extracts a `u64` (seeds), returning `default` if missing or wrong type.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Schema entry for a numeric parameter.
pub fn schema_number(default: f64, min: f64, max: f64, description: &str) -> Value {
    json!({
        "type": "number",
        "default": default,
        "min": min,
        "max": max,
        "description": description,
    })
}

/// Schema entry for an integer parameter.
pub fn schema_integer(default: usize, min: usize, max: usize, description: &str) -> Value {
    json!({
        "type": "integer",
        "default": default,
        "min": min,
        "max": max,
        "description": description,
    })
}

/// Schema entry for a string parameter restricted to `options`.
pub fn schema_choice(default: &str, options: &[&str], description: &str) -> Value {
    json!({
        "type": "string",
        "default": default,
        "options": options,
        "description": description,
    })
}
