//! Downloadable import templates, embedded in the binary.
//!
//! One file per entity type and format at
//! `templates/{entity}/{entity}-template.{csv|json|yaml}`. Each template
//! mixes a record with a custom id and one without, to document the
//! server-side auto-generation behavior.

use include_dir::{include_dir, Dir};

use crate::mapper::{FieldMapper, LabelMapper, ProviderMapper, SubscriptionMapper};
use crate::model::EntityKind;
use crate::parser::{parse_str, FileFormat, RawRow};

static TEMPLATES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

pub const ALL: [(EntityKind, FileFormat); 9] = [
    (EntityKind::Label, FileFormat::Csv),
    (EntityKind::Label, FileFormat::Json),
    (EntityKind::Label, FileFormat::Yaml),
    (EntityKind::Provider, FileFormat::Csv),
    (EntityKind::Provider, FileFormat::Json),
    (EntityKind::Provider, FileFormat::Yaml),
    (EntityKind::Subscription, FileFormat::Csv),
    (EntityKind::Subscription, FileFormat::Json),
    (EntityKind::Subscription, FileFormat::Yaml),
];

/// Path of a template inside the fixed convention, e.g.
/// `label/label-template.csv`.
pub fn template_path(kind: EntityKind, format: FileFormat) -> String {
    format!(
        "{}/{}-template.{}",
        kind.as_str(),
        kind.as_str(),
        format.extension()
    )
}

pub fn template_file_name(kind: EntityKind, format: FileFormat) -> String {
    format!("{}-template.{}", kind.as_str(), format.extension())
}

pub fn template_content(kind: EntityKind, format: FileFormat) -> Option<&'static str> {
    TEMPLATES
        .get_file(template_path(kind, format))
        .and_then(|file| file.contents_utf8())
}

/// Batch-check every embedded template: it must decode, every record must
/// pass validation, required headers must be present (CSV), and the file
/// must mix records with and without an id. Returns the list of findings;
/// empty means all templates are sound.
pub fn validate_templates() -> Vec<String> {
    let mut issues = Vec::new();

    for (kind, format) in ALL {
        let path = template_path(kind, format);
        let Some(content) = template_content(kind, format) else {
            issues.push(format!("{path}: template file is missing"));
            continue;
        };

        let rows = match parse_str(format, content, None) {
            Ok(rows) => rows,
            Err(e) => {
                issues.push(format!("{path}: {e}"));
                continue;
            }
        };
        if rows.is_empty() {
            issues.push(format!("{path}: template contains no records"));
            continue;
        }

        if format == FileFormat::Csv {
            check_required_headers(kind, content, &path, &mut issues);
        }
        check_id_mix(&rows, &path, &mut issues);

        match kind {
            EntityKind::Label => check_records(&LabelMapper, &rows, &path, &mut issues),
            EntityKind::Provider => check_records(&ProviderMapper, &rows, &path, &mut issues),
            EntityKind::Subscription => {
                check_records(&SubscriptionMapper, &rows, &path, &mut issues)
            }
        }
    }

    issues
}

fn required_fields(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Label => &["name", "color"],
        EntityKind::Provider => &["name"],
        EntityKind::Subscription => &["providerKey", "startDate", "recurrency"],
    }
}

fn check_required_headers(kind: EntityKind, content: &str, path: &str, issues: &mut Vec<String>) {
    let headers: Vec<&str> = content
        .lines()
        .next()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .collect();
    for field in required_fields(kind) {
        if !headers.contains(field) {
            issues.push(format!("{path}: header is missing required field '{field}'"));
        }
    }
}

/// Every populated id documents the custom-id path, every absent one the
/// auto-generation path; a template must show both.
fn check_id_mix(rows: &[RawRow], path: &str, issues: &mut Vec<String>) {
    let with_id = rows.iter().filter(|row| has_id(row)).count();
    if with_id == 0 {
        issues.push(format!("{path}: no record with a custom id"));
    }
    if with_id == rows.len() {
        issues.push(format!("{path}: no record without an id"));
    }
}

fn has_id(row: &RawRow) -> bool {
    matches!(row.get("id"), Some(serde_json::Value::String(s)) if !s.trim().is_empty())
}

fn check_records<M: FieldMapper>(mapper: &M, rows: &[RawRow], path: &str, issues: &mut Vec<String>) {
    for record in mapper.parse_records(rows) {
        for error in &record.validation_errors {
            issues.push(format!(
                "{path}: record {} field '{}': {}",
                record.index, error.field, error.message
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_are_present() {
        for (kind, format) in ALL {
            assert!(
                template_content(kind, format).is_some(),
                "missing template for {kind} {format:?}"
            );
        }
    }

    #[test]
    fn test_embedded_templates_pass_the_batch_validator() {
        let issues = validate_templates();
        assert!(issues.is_empty(), "template issues: {issues:#?}");
    }
}
