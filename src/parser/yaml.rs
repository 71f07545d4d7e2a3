//! YAML decoding: the document must be a top-level sequence of mappings,
//! mirroring the JSON contract. Decoded values are converted to JSON values
//! so the mappers see one raw representation regardless of source format.

use serde_json::Value;

use crate::error::{ParseEntry, ParseError};

use super::RawRow;

pub(super) fn parse(content: &str) -> Result<Vec<RawRow>, ParseError> {
    let document: serde_yml::Value = serde_yml::from_str(content).map_err(|e| {
        let line = e.location().map(|l| l.line());
        ParseError::Structural {
            entries: vec![ParseEntry::new(line, e.to_string())],
        }
    })?;

    let elements = match document {
        serde_yml::Value::Sequence(elements) => elements,
        serde_yml::Value::Null => Vec::new(),
        _ => {
            return Err(ParseError::structural(
                "top-level YAML value must be a sequence of mappings",
            ));
        }
    };

    let mut rows = Vec::with_capacity(elements.len());
    for (position, element) in elements.into_iter().enumerate() {
        match to_json(element) {
            Ok(Value::Object(map)) => rows.push(map.into_iter().collect()),
            Ok(_) => {
                return Err(ParseError::structural(format!(
                    "element {} must be a mapping",
                    position
                )));
            }
            Err(message) => {
                return Err(ParseError::structural(format!(
                    "element {}: {}",
                    position, message
                )));
            }
        }
    }
    Ok(rows)
}

/// Convert a YAML value into its JSON equivalent. Mapping keys must be
/// strings; anything else cannot address a field.
fn to_json(value: serde_yml::Value) -> Result<Value, String> {
    match value {
        serde_yml::Value::Null => Ok(Value::Null),
        serde_yml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("non-finite number {f}"))
            } else {
                Err("unrepresentable number".to_string())
            }
        }
        serde_yml::Value::String(s) => Ok(Value::String(s)),
        serde_yml::Value::Sequence(items) => items
            .into_iter()
            .map(to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yml::Value::Mapping(mapping) => {
            let mut object = serde_json::Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                let serde_yml::Value::String(key) = key else {
                    return Err("mapping keys must be strings".to_string());
                };
                object.insert(key, to_json(value)?);
            }
            Ok(Value::Object(object))
        }
        serde_yml::Value::Tagged(tagged) => to_json(tagged.value),
    }
}
