//! Elapsed-time normalization
//!
//! Request durations are written either as plain numbers (milliseconds) or
//! as strings with a unit suffix such as `"125ms"` or `"1.5s"`. Everything is
//! normalized to whole milliseconds. Values that cannot be read are absent,
//! never zero, so they stay out of averages.

use serde_json::Value;

/// Normalize a JSON duration value to milliseconds.
pub fn parse_duration_ms(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(|ms| to_millis(ms, 1.0)),
        Value::String(s) => parse_duration_str(s),
        _ => None,
    }
}

/// Parse a duration string: a decimal number followed by an optional unit.
///
/// # Examples
/// ```
/// use logsift::parsing::duration::parse_duration_str;
///
/// assert_eq!(parse_duration_str("250ms"), Some(250));
/// assert_eq!(parse_duration_str("1.5s"), Some(1500));
/// assert_eq!(parse_duration_str("fast"), None);
/// ```
pub fn parse_duration_str(text: &str) -> Option<u64> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);

    if number.is_empty() {
        return None;
    }

    let factor = unit_factor(unit.trim())?;
    let amount: f64 = number.parse().ok()?;
    to_millis(amount, factor)
}

/// Milliseconds per unit
fn unit_factor(unit: &str) -> Option<f64> {
    match unit {
        "" | "ms" => Some(1.0),
        "s" | "sec" => Some(1_000.0),
        "m" | "min" => Some(60_000.0),
        "us" | "µs" => Some(0.001),
        "ns" => Some(0.000_001),
        _ => None,
    }
}

fn to_millis(amount: f64, factor: f64) -> Option<u64> {
    let ms = amount * factor;
    if !ms.is_finite() || ms < 0.0 || ms > u64::MAX as f64 {
        return None;
    }
    Some(ms.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_numbers_are_milliseconds() {
        assert_eq!(parse_duration_ms(&json!(120)), Some(120));
        assert_eq!(parse_duration_ms(&json!(12.6)), Some(13));
        assert_eq!(parse_duration_ms(&json!(0)), Some(0));
    }

    #[test]
    fn test_negative_numbers_are_absent() {
        assert_eq!(parse_duration_ms(&json!(-5)), None);
        assert_eq!(parse_duration_str("-5ms"), None);
    }

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(parse_duration_str("900ms"), Some(900));
        assert_eq!(parse_duration_str("900"), Some(900));
        assert_eq!(parse_duration_str("2s"), Some(2000));
        assert_eq!(parse_duration_str("0.25sec"), Some(250));
        assert_eq!(parse_duration_str("1m"), Some(60_000));
        assert_eq!(parse_duration_str("1500us"), Some(2));
        assert_eq!(parse_duration_str("1500µs"), Some(2));
        assert_eq!(parse_duration_str("3000000ns"), Some(3));
        assert_eq!(parse_duration_str(" 45 ms "), Some(45));
    }

    #[test]
    fn test_malformed_strings_are_absent() {
        assert_eq!(parse_duration_str(""), None);
        assert_eq!(parse_duration_str("ms"), None);
        assert_eq!(parse_duration_str("abc"), None);
        assert_eq!(parse_duration_str("12 parsecs"), None);
        assert_eq!(parse_duration_str("1.2.3ms"), None);
        assert_eq!(parse_duration_str("."), None);
    }

    #[test]
    fn test_non_numeric_json_is_absent() {
        assert_eq!(parse_duration_ms(&json!(null)), None);
        assert_eq!(parse_duration_ms(&json!(true)), None);
        assert_eq!(parse_duration_ms(&json!({"ms": 5})), None);
        assert_eq!(parse_duration_ms(&json!([5])), None);
    }
}
