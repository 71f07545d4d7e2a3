//! Per-entity field mapping and validation.
//!
//! Mapping is a total function: unknown fields are ignored, missing fields
//! become absent/defaulted, and uncoercible values are carried through as
//! raw text. Required-field enforcement lives entirely in validation, which
//! collects errors and never throws. Validation errors come out in a fixed
//! order (fields in declaration order, required checks before format checks
//! before cross-field checks) so multi-failure records report
//! deterministically.

mod label;
mod provider;
mod subscription;
mod value;

pub use label::LabelMapper;
pub use provider::ProviderMapper;
pub use subscription::SubscriptionMapper;

use serde_json::Value;

use crate::model::{
    FieldValue, ImportEntity, Owner, OwnerType, ParsedImportRecord, ValidationError,
};
use crate::parser::RawRow;

/// Converts raw rows into typed candidates and validates them.
pub trait FieldMapper {
    type Entity: ImportEntity;

    /// Map a raw row into a candidate entity. Never fails.
    fn map_fields(&self, row: &RawRow) -> Self::Entity;

    /// Run the entity's validation rules, collecting field-level findings.
    fn validate(&self, entity: &Self::Entity) -> Vec<ValidationError>;

    /// Map and validate a parsed sequence, assigning each record its stable
    /// zero-based index.
    fn parse_records(&self, rows: &[RawRow]) -> Vec<ParsedImportRecord<Self::Entity>> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| {
                let data = self.map_fields(row);
                let validation_errors = self.validate(&data);
                ParsedImportRecord {
                    index,
                    data,
                    validation_errors,
                }
            })
            .collect()
    }
}

/// Map ownership fields, accepting a nested `owner` object (JSON/YAML), a
/// bare `owner` scalar holding the type, or the flat CSV-style aliases.
/// A missing type defaults to personal ownership.
pub(crate) fn map_owner(row: &RawRow) -> Owner {
    let mut type_raw: Option<String> = None;
    let mut family_id: Option<String> = None;

    match value::raw_field(row, &["owner"]) {
        Some(Value::Object(obj)) => {
            type_raw = obj.get("type").and_then(value::scalar_string);
            family_id = obj
                .get("familyId")
                .or_else(|| obj.get("family_id"))
                .and_then(value::scalar_string);
        }
        Some(other) => type_raw = value::scalar_string(other),
        None => {}
    }
    if type_raw.is_none() {
        type_raw = value::string_field(row, &["ownerType", "owner_type"]);
    }
    if family_id.is_none() {
        family_id = value::string_field(
            row,
            &["ownerFamilyId", "owner_family_id", "familyId", "family_id"],
        );
    }

    let owner_type = match type_raw {
        None => FieldValue::Value(OwnerType::Personal),
        Some(raw) => match OwnerType::parse(&raw) {
            Some(t) => FieldValue::Value(t),
            None => FieldValue::Invalid(raw),
        },
    };
    Owner {
        owner_type,
        family_id,
    }
}

/// Ownership rules. A family owner without a family id errors on the
/// `ownerFamilyId` field, not on the type, so the offending field is the
/// one highlighted.
pub(crate) fn validate_owner(owner: &Owner, errors: &mut Vec<ValidationError>) {
    match &owner.owner_type {
        FieldValue::Invalid(raw) => errors.push(ValidationError::error(
            "ownerType",
            format!("'{raw}' is not one of personal, family, system"),
        )),
        FieldValue::Value(OwnerType::Family) => {
            if owner.family_id.is_none() {
                errors.push(ValidationError::error(
                    "ownerFamilyId",
                    "family ownership requires a family id",
                ));
            }
        }
        _ => {}
    }
}

/// An absent or empty id means the server generates one; only a present,
/// malformed value is an error.
pub(crate) fn validate_id(id: &Option<String>, errors: &mut Vec<ValidationError>) {
    if let Some(id) = id {
        if !value::is_uuid(id) {
            errors.push(ValidationError::error(
                "id",
                format!(
                    "'{}' is not a valid UUID (expected {})",
                    id,
                    value::UUID_PATTERN
                ),
            ));
        }
    }
}

pub(crate) fn validate_url(field: &str, url: &Option<String>, errors: &mut Vec<ValidationError>) {
    if let Some(url) = url {
        if !value::is_http_url(url) {
            errors.push(ValidationError::error(
                field,
                format!("'{url}' is not an http(s) URL"),
            ));
        }
    }
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
    fn test_owner_defaults_to_personal() {
        let owner = map_owner(&row(&[]));
        assert_eq!(owner.owner_type.value(), Some(&OwnerType::Personal));
        assert_eq!(owner.family_id, None);
    }

    #[test]
    fn test_owner_from_nested_object() {
        let owner = map_owner(&row(&[(
            "owner",
            json!({"type": "family", "familyId": "fam-1"}),
        )]));
        assert_eq!(owner.owner_type.value(), Some(&OwnerType::Family));
        assert_eq!(owner.family_id.as_deref(), Some("fam-1"));
    }

    #[test]
    fn test_owner_from_flat_aliases() {
        let owner = map_owner(&row(&[
            ("ownerType", json!("family")),
            ("ownerFamilyId", json!("fam-2")),
        ]));
        assert_eq!(owner.owner_type.value(), Some(&OwnerType::Family));
        assert_eq!(owner.family_id.as_deref(), Some("fam-2"));
    }

    #[test]
    fn test_family_owner_without_id_errors_on_family_id_field() {
        let owner = map_owner(&row(&[("ownerType", json!("family"))]));
        let mut errors = Vec::new();
        validate_owner(&owner, &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "ownerFamilyId");
    }

    #[test]
    fn test_unknown_owner_type_errors_on_type_field() {
        let owner = map_owner(&row(&[("ownerType", json!("corporate"))]));
        let mut errors = Vec::new();
        validate_owner(&owner, &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "ownerType");
    }

    #[test]
    fn test_id_rules() {
        let mut errors = Vec::new();
        validate_id(&None, &mut errors);
        assert!(errors.is_empty());

        validate_id(
            &Some("9b1deb4d-3b7d-4bad-9bdd-2b0d7b3dcb6d".to_string()),
            &mut errors,
        );
        assert!(errors.is_empty());

        validate_id(&Some("not-a-uuid".to_string()), &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "id");
        assert!(errors[0].message.contains("not-a-uuid"));
    }
}
