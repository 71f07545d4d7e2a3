//! CSV decoding: first non-empty line is the header row, headers and values
//! are trimmed, blank lines are skipped, and structural errors are reported
//! with line numbers.

use csv::ReaderBuilder;
use serde_json::Value;

use crate::error::{ParseEntry, ParseError};

use super::{ProgressFn, RawRow};

pub(super) fn parse(
    content: &str,
    progress: &mut Option<ProgressFn<'_>>,
) -> Result<Vec<RawRow>, ParseError> {
    let total_bytes = content.len() as f32;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(|h| h.trim().to_string()).collect(),
        Err(e) => return Err(ParseError::Structural {
            entries: vec![entry_for(&e)],
        }),
    };

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for result in reader.records() {
        match result {
            Ok(record) => {
                let row: RawRow = headers
                    .iter()
                    .zip(record.iter())
                    .map(|(header, value)| {
                        (header.clone(), Value::String(value.trim().to_string()))
                    })
                    .collect();
                rows.push(row);

                if let Some(report) = progress.as_deref_mut() {
                    if total_bytes > 0.0 {
                        let consumed = record.position().map(|p| p.byte()).unwrap_or(0) as f32;
                        report((consumed / total_bytes).min(1.0));
                    }
                }
            }
            Err(e) => errors.push(entry_for(&e)),
        }
    }

    if !errors.is_empty() {
        return Err(ParseError::Structural { entries: errors });
    }

    Ok(rows)
}

fn entry_for(e: &csv::Error) -> ParseEntry {
    let line = e.position().map(|p| p.line() as usize);
    // The csv crate's messages repeat the position; keep just the cause.
    let message = match e.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("expected {} columns, found {}", expected_len, len)
        }
        _ => e.to_string(),
    };
    ParseEntry::new(line, message)
}
