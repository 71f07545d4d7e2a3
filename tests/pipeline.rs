//! End-to-end pipeline tests: file on disk → parse → map → validate →
//! import, plus template round-trips.

use std::io::Write;

use async_trait::async_trait;
use serde_json::{json, Value};
use subtrack_cli::api::RecordSubmitter;
use subtrack_cli::error::{ParseError, SubmitError};
use subtrack_cli::import::{ImportManager, RecordStatus};
use subtrack_cli::mapper::{FieldMapper, LabelMapper, ProviderMapper, SubscriptionMapper};
use subtrack_cli::model::EntityKind;
use subtrack_cli::parser::{parse_file, parse_str, FileFormat};
use subtrack_cli::templates;

struct AcceptAll;

#[async_trait]
impl RecordSubmitter for AcceptAll {
    async fn submit(&self, _kind: EntityKind, _payload: Value) -> Result<Value, SubmitError> {
        Ok(json!({ "id": "generated" }))
    }
}

fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_unsupported_extension_is_rejected_before_decoding() {
    // The content is not valid in any supported format; it is never read.
    let file = temp_file(".xml", "<labels><label/></labels>");
    let err = parse_file(file.path(), None).unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnsupportedExtension { ref extension } if extension == "xml"
    ));
}

#[test]
fn test_csv_file_round_trip_from_disk() {
    let file = temp_file(".csv", "name,color\nEntertainment,#FF5733\nBad,not-a-color\n");
    let rows = parse_file(file.path(), None).unwrap();
    let records = LabelMapper.parse_records(&rows);

    assert_eq!(records.len(), 2);
    assert!(records[0].is_valid());
    assert_eq!(records[0].data.color.as_deref(), Some("#FF5733"));
    assert!(!records[1].is_valid());
    assert!(records[1]
        .validation_errors
        .iter()
        .any(|e| e.field == "color"));
}

#[test]
fn test_template_round_trip_every_entity_and_format() {
    for (kind, format) in templates::ALL {
        let content = templates::template_content(kind, format)
            .unwrap_or_else(|| panic!("missing template {kind} {format:?}"));
        let rows = parse_str(format, content, None)
            .unwrap_or_else(|e| panic!("template {kind} {format:?} failed to parse: {e}"));
        assert!(!rows.is_empty());

        let verdicts: Vec<bool> = match kind {
            EntityKind::Label => LabelMapper
                .parse_records(&rows)
                .iter()
                .map(|r| r.is_valid())
                .collect(),
            EntityKind::Provider => ProviderMapper
                .parse_records(&rows)
                .iter()
                .map(|r| r.is_valid())
                .collect(),
            EntityKind::Subscription => SubscriptionMapper
                .parse_records(&rows)
                .iter()
                .map(|r| r.is_valid())
                .collect(),
        };
        assert!(
            verdicts.iter().all(|v| *v),
            "template {kind} {format:?} has invalid records"
        );
    }
}

#[test]
fn test_template_batch_validator_accepts_the_shipped_templates() {
    let issues = templates::validate_templates();
    assert!(issues.is_empty(), "issues: {issues:#?}");
}

#[tokio::test]
async fn test_yaml_file_to_successful_import() {
    let file = temp_file(
        ".yaml",
        "- name: Entertainment\n  color: \"#FF5733\"\n- name: Utilities\n  color: \"00A878\"\n",
    );
    let rows = parse_file(file.path(), None).unwrap();
    let records = LabelMapper.parse_records(&rows);
    let indices: Vec<usize> = records.iter().map(|r| r.index).collect();

    let mut manager = ImportManager::new();
    manager
        .import_records(&records, &indices, &AcceptAll, &mut |_, _| {})
        .await;

    assert_eq!(manager.status(0), RecordStatus::Success);
    assert_eq!(manager.status(1), RecordStatus::Success);
    assert_eq!(manager.progress().completed, 2);
    assert_eq!(manager.progress().failed, 0);
}

#[test]
fn test_structural_csv_error_surfaces_line_numbers() {
    let file = temp_file(".csv", "name,color\nA,#111111\nB\nC,#222222,extra\n");
    let err = parse_file(file.path(), None).unwrap_err();
    let entries = err.entries();
    assert!(!entries.is_empty());
    assert_eq!(entries[0].line, Some(3));
}
