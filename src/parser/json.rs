//! JSON decoding: the document must be a top-level array of objects.
//! Values are not coerced; they keep their JSON types for the mappers.

use serde_json::Value;

use crate::error::{ParseEntry, ParseError};

use super::RawRow;

pub(super) fn parse(content: &str) -> Result<Vec<RawRow>, ParseError> {
    let document: Value = serde_json::from_str(content).map_err(|e| {
        let line = if e.line() > 0 { Some(e.line()) } else { None };
        ParseError::Structural {
            entries: vec![ParseEntry::new(line, e.to_string())],
        }
    })?;

    let elements = match document {
        Value::Array(elements) => elements,
        other => {
            return Err(ParseError::structural(format!(
                "top-level JSON value must be an array of objects, found {}",
                type_name(&other)
            )));
        }
    };

    let mut rows = Vec::with_capacity(elements.len());
    for (position, element) in elements.into_iter().enumerate() {
        match element {
            Value::Object(map) => rows.push(map.into_iter().collect()),
            other => {
                return Err(ParseError::structural(format!(
                    "element {} must be an object, found {}",
                    position,
                    type_name(&other)
                )));
            }
        }
    }
    Ok(rows)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse_str, FileFormat};

    #[test]
    fn test_array_of_objects_keeps_native_types() {
        let rows = parse_str(
            FileFormat::Json,
            r#"[{"name":"Netflix","labels":["tv","movies"],"priority":2}]"#,
            None,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Netflix");
        assert!(rows[0]["labels"].is_array());
        assert_eq!(rows[0]["priority"], 2);
    }

    #[test]
    fn test_top_level_object_is_rejected() {
        let err = parse_str(FileFormat::Json, r#"{"name":"A"}"#, None).unwrap_err();
        assert!(err.to_string().contains("array of objects"), "{err}");
    }

    #[test]
    fn test_non_object_element_is_rejected() {
        let err = parse_str(FileFormat::Json, r#"[{"name":"A"}, 42]"#, None).unwrap_err();
        assert!(err.to_string().contains("element 1"), "{err}");
    }

    #[test]
    fn test_syntax_error_carries_line() {
        let err = parse_str(FileFormat::Json, "[\n{\"name\": }\n]", None).unwrap_err();
        let entries = err.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line, Some(2));
    }
}
