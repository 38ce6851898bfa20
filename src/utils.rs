/// Utility functions
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Human-readable JSON type of a value, used in error messages
pub fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract an integer from a JSON number, accepting floats without a fractional part
pub fn int(v: &Value) -> Option<i64> {
    if let Some(x) = v.as_i64() {
        return Some(x);
    }
    let x = v.as_f64()?;
    if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 {
        return Some(x as i64);
    }
    None
}

/// Convert a Unix epoch (seconds, possibly fractional) into a UTC timestamp
pub fn epoch_to_utc(v: &Value) -> Option<DateTime<Utc>> {
    if let Some(secs) = v.as_i64() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    let secs = v.as_f64()?;
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return None;
    }
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    // 0.9999999999 rounds up to a full second
    let (whole, nanos) = if nanos >= 1_000_000_000 {
        (whole as i64 + 1, 0)
    } else {
        (whole as i64, nanos)
    };
    Utc.timestamp_opt(whole, nanos).single()
}
