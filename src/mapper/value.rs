//! Field lookup and coercion helpers shared by the entity mappers.
//!
//! All coercions are total: a value that cannot be coerced survives as
//! [`FieldValue::Invalid`] carrying the raw text, so validation can report
//! the offending value instead of the mapper silently discarding data.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::model::FieldValue;
use crate::parser::RawRow;

/// UUID textual pattern: 8-4-4-4-12 hex, version nibble 1-5, variant
/// nibble 8/9/a/b.
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .expect("uuid pattern compiles")
});

/// Hex color, `#` optional, 6-digit RGB or 8-digit ARGB.
static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?[0-9A-Fa-f]{6}([0-9A-Fa-f]{2})?$").expect("color pattern compiles")
});

pub const UUID_PATTERN: &str = "xxxxxxxx-xxxx-Vxxx-Nxxx-xxxxxxxxxxxx (hex, V in 1-5, N in 8-b)";

/// Look up the first alias present in the row.
pub(crate) fn raw_field<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| row.get(*alias))
}

/// Render a scalar value as a trimmed string. Arrays, objects, null and
/// empty strings yield `None`.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

/// First present alias rendered as a non-empty trimmed string.
pub(crate) fn string_field(row: &RawRow, aliases: &[&str]) -> Option<String> {
    raw_field(row, aliases).and_then(scalar_string)
}

/// Coerce an ISO-8601 (`YYYY-MM-DD`) date.
pub(crate) fn date_field(row: &RawRow, aliases: &[&str]) -> FieldValue<NaiveDate> {
    match raw_field(row, aliases) {
        None => FieldValue::Missing,
        Some(value) => coerce_date(value),
    }
}

pub(crate) fn coerce_date(value: &Value) -> FieldValue<NaiveDate> {
    let Some(text) = scalar_string(value) else {
        return absent_or_invalid(value);
    };
    match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        Ok(date) => FieldValue::Value(date),
        Err(_) => FieldValue::Invalid(text),
    }
}

/// Coerce a (possibly string-encoded) number.
pub(crate) fn number_field(row: &RawRow, aliases: &[&str]) -> FieldValue<f64> {
    match raw_field(row, aliases) {
        None => FieldValue::Missing,
        Some(value) => coerce_number(value),
    }
}

pub(crate) fn coerce_number(value: &Value) -> FieldValue<f64> {
    if let Value::Number(n) = value {
        return match n.as_f64() {
            Some(f) => FieldValue::Value(f),
            None => FieldValue::Invalid(n.to_string()),
        };
    }
    let Some(text) = scalar_string(value) else {
        return absent_or_invalid(value);
    };
    match text.parse::<f64>() {
        Ok(f) => FieldValue::Value(f),
        Err(_) => FieldValue::Invalid(text),
    }
}

/// Coerce a non-negative integer (string-encoded or native).
pub(crate) fn integer_field(row: &RawRow, aliases: &[&str]) -> FieldValue<u32> {
    let Some(value) = raw_field(row, aliases) else {
        return FieldValue::Missing;
    };
    if let Value::Number(n) = value {
        return match n.as_u64().and_then(|u| u32::try_from(u).ok()) {
            Some(u) => FieldValue::Value(u),
            None => FieldValue::Invalid(n.to_string()),
        };
    }
    let Some(text) = scalar_string(value) else {
        return absent_or_invalid(value);
    };
    match text.parse::<u32>() {
        Ok(u) => FieldValue::Value(u),
        Err(_) => FieldValue::Invalid(text),
    }
}

/// A value with no scalar text: null and blank strings count as absent
/// (CSV represents optional fields as empty cells), anything else is
/// carried through as invalid raw text.
fn absent_or_invalid<T>(value: &Value) -> FieldValue<T> {
    match value {
        Value::Null => FieldValue::Missing,
        Value::String(s) if s.trim().is_empty() => FieldValue::Missing,
        other => FieldValue::Invalid(other.to_string()),
    }
}

/// Normalize a list supplied either as a native array (JSON/YAML) or a
/// comma-separated string (CSV-friendly) into trimmed, non-empty strings.
pub(crate) fn list_field(row: &RawRow, aliases: &[&str]) -> Vec<String> {
    match raw_field(row, aliases) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_string).collect(),
        Some(value) => scalar_string(value)
            .map(|text| {
                text.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Normalize a hex color to its leading-`#` form, or `None` when the value
/// does not match the accepted pattern.
pub(crate) fn normalize_color(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !COLOR_RE.is_match(raw) {
        return None;
    }
    if let Some(stripped) = raw.strip_prefix('#') {
        Some(format!("#{stripped}"))
    } else {
        Some(format!("#{raw}"))
    }
}

pub(crate) fn is_uuid(s: &str) -> bool {
    UUID_RE.is_match(s)
}

pub(crate) fn is_http_url(s: &str) -> bool {
    let lower = s.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_alias_resolution_order() {
        let row = row(&[("label_name", json!("Movies"))]);
        assert_eq!(
            string_field(&row, &["name", "labelName", "label_name"]),
            Some("Movies".to_string())
        );
        assert_eq!(string_field(&row, &["missing"]), None);
    }

    #[test]
    fn test_numeric_string_coercion() {
        let row = row(&[("amount", json!("12.50")), ("bad", json!("a lot"))]);
        assert_eq!(number_field(&row, &["amount"]), FieldValue::Value(12.5));
        assert_eq!(
            number_field(&row, &["bad"]),
            FieldValue::Invalid("a lot".to_string())
        );
        assert_eq!(number_field(&row, &["absent"]), FieldValue::Missing);
    }

    #[test]
    fn test_date_coercion_keeps_raw_on_failure() {
        let row = row(&[("start", json!("2024-02-29")), ("bad", json!("tomorrow"))]);
        assert!(matches!(date_field(&row, &["start"]), FieldValue::Value(_)));
        assert_eq!(
            date_field(&row, &["bad"]),
            FieldValue::Invalid("tomorrow".to_string())
        );
    }

    #[test]
    fn test_list_from_array_and_comma_string() {
        let row = row(&[
            ("native", json!(["tv", " movies ", ""])),
            ("csvish", json!("tv, movies, ,music")),
        ]);
        assert_eq!(list_field(&row, &["native"]), vec!["tv", "movies"]);
        assert_eq!(list_field(&row, &["csvish"]), vec!["tv", "movies", "music"]);
        assert!(list_field(&row, &["absent"]).is_empty());
    }

    #[test]
    fn test_color_normalization() {
        assert_eq!(normalize_color("FF5733"), Some("#FF5733".to_string()));
        assert_eq!(normalize_color("#FF5733"), Some("#FF5733".to_string()));
        assert_eq!(normalize_color("#FF5733AA"), Some("#FF5733AA".to_string()));
        assert_eq!(normalize_color("not-a-color"), None);
        assert_eq!(normalize_color("#FFF"), None);
    }

    #[test]
    fn test_uuid_pattern() {
        assert!(is_uuid("9b1deb4d-3b7d-4bad-9bdd-2b0d7b3dcb6d"));
        assert!(is_uuid("9B1DEB4D-3B7D-4BAD-9BDD-2B0D7B3DCB6D"));
        // version nibble 0 and variant nibble 7 are outside the pattern
        assert!(!is_uuid("9b1deb4d-3b7d-0bad-9bdd-2b0d7b3dcb6d"));
        assert!(!is_uuid("9b1deb4d-3b7d-4bad-7bdd-2b0d7b3dcb6d"));
        assert!(!is_uuid("not-a-uuid"));
    }
}
