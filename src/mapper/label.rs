//! Label field mapping and validation.

use crate::model::{LabelCandidate, ValidationError};
use crate::parser::RawRow;

use super::value::{normalize_color, string_field};
use super::{map_owner, validate_id, validate_owner, FieldMapper};

pub struct LabelMapper;

impl FieldMapper for LabelMapper {
    type Entity = LabelCandidate;

    fn map_fields(&self, row: &RawRow) -> LabelCandidate {
        // Matching colors are normalized to the leading-# form here; a
        // non-matching value survives raw for validation to report.
        let color = string_field(row, &["color", "colour", "hexColor", "hex_color"])
            .map(|raw| normalize_color(&raw).unwrap_or(raw));
        LabelCandidate {
            id: string_field(row, &["id", "labelId", "label_id"]),
            name: string_field(row, &["name", "labelName", "label_name"]),
            color,
            owner: map_owner(row),
        }
    }

    fn validate(&self, entity: &LabelCandidate) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if entity.name.is_none() {
            errors.push(ValidationError::error("name", "name is required"));
        }
        if entity.color.is_none() {
            errors.push(ValidationError::error("color", "color is required"));
        }

        validate_id(&entity.id, &mut errors);
        if let Some(color) = &entity.color {
            if normalize_color(color).is_none() {
                errors.push(ValidationError::error(
                    "color",
                    format!("'{color}' is not a hex color (RRGGBB or AARRGGBB, '#' optional)"),
                ));
            }
        }
        validate_owner(&entity.owner, &mut errors);

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use crate::parser::{parse_str, FileFormat};

    #[test]
    fn test_csv_scenario_valid_and_invalid_color() {
        let rows = parse_str(
            FileFormat::Csv,
            "name,color\nEntertainment,#FF5733\nBad,not-a-color",
            None,
        )
        .unwrap();
        let records = LabelMapper.parse_records(&rows);
        assert_eq!(records.len(), 2);

        assert!(records[0].is_valid());
        assert_eq!(records[0].index, 0);
        assert_eq!(records[0].data.color.as_deref(), Some("#FF5733"));

        assert!(!records[1].is_valid());
        let color_error = records[1]
            .validation_errors
            .iter()
            .find(|e| e.field == "color")
            .expect("color error");
        assert_eq!(color_error.severity, Severity::Error);
    }

    #[test]
    fn test_color_without_hash_is_normalized() {
        let rows = parse_str(FileFormat::Csv, "name,color\nMusic,00A878", None).unwrap();
        let records = LabelMapper.parse_records(&rows);
        assert!(records[0].is_valid());
        assert_eq!(records[0].data.color.as_deref(), Some("#00A878"));
    }

    #[test]
    fn test_missing_required_fields_report_in_declaration_order() {
        let rows = parse_str(FileFormat::Json, r#"[{}]"#, None).unwrap();
        let records = LabelMapper.parse_records(&rows);
        let fields: Vec<&str> = records[0]
            .validation_errors
            .iter()
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(fields, vec!["name", "color"]);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let rows = parse_str(FileFormat::Csv, "name,color\nBad,nope", None).unwrap();
        let entity = LabelMapper.map_fields(&rows[0]);
        let first = LabelMapper.validate(&entity);
        let second = LabelMapper.validate(&entity);
        assert_eq!(first, second);
    }
}
