//! Tolerant field coercion for externally produced records.
//!
//! Device, wire and panel records are produced by the drawing and persistence
//! layers, which do not agree on field types: a length may arrive as `100`,
//! `100.0` or `"100"`, a gauge as `18`, `"18"` or `"18 AWG"`. The helpers here
//! coerce what they can and report absence for the rest, so a bad field never
//! fails the whole record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a finite number from free text, ignoring surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read a finite number from a JSON number or numeric string.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Read non-empty text from a JSON string or number.
pub fn text_from_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Clamp to a finite, non-negative value. NaN, infinities and negatives become 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Normalize a wire gauge spelling: `"18"`, `18`, `"18.0"`, `"18AWG"`,
/// `"18 awg"`, `"#18"` and `"AWG 18"` all become `"18"`.
///
/// Spellings that are not a plain gauge number are returned trimmed and
/// upper-cased so that grouping stays stable.
pub fn normalize_gauge(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    let stripped = upper.replace("AWG", "");
    let core = stripped.trim().trim_start_matches('#').trim();

    match parse_number(core) {
        Some(n) if n >= 0.0 && n.fract() == 0.0 => format!("{}", n as u32),
        _ => core.to_string(),
    }
}

/// Parse a gauge spelling into its AWG number.
pub fn parse_awg(raw: &str) -> Option<u32> {
    normalize_gauge(raw).parse::<u32>().ok()
}

/// serde: number or numeric string, clamped to >= 0; anything else is 0.
pub fn de_non_negative_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).map(non_negative).unwrap_or(0.0))
}

/// serde: optional number or numeric string; unparseable becomes `None`.
pub fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

/// serde: string or number rendered as text; other shapes become empty.
pub fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value).unwrap_or_default())
}

/// serde: gauge as string or integer, normalized with [`normalize_gauge`].
pub fn de_opt_gauge<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value)
        .map(|g| normalize_gauge(&g))
        .filter(|g| !g.is_empty()))
}

/// serde: boolean flag that also accepts `1`/`0` and `"true"`/`"yes"`.
pub fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        _ => false,
    })
}
