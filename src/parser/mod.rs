//! FileParser: turns a user-selected import file into an ordered sequence
//! of raw rows.
//!
//! Format is detected from the filename extension before any content is
//! read, and the size ceiling is enforced from file metadata so a
//! pathological file never gets loaded. Decoding produces untyped rows;
//! typing and validation happen in the mappers.

mod csv;
mod json;
mod yaml;

use std::collections::HashMap;
use std::path::Path;

use log::{debug, info};

use crate::error::ParseError;

/// One decoded row: source field name to raw value. CSV values are always
/// strings; JSON/YAML values keep their native types.
pub type RawRow = HashMap<String, serde_json::Value>;

/// Import files over this many bytes are rejected without being read.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Advisory decode-progress callback, called with a fraction in `0..=1`.
pub type ProgressFn<'a> = &'a mut dyn FnMut(f32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Csv,
    Json,
    Yaml,
}

impl FileFormat {
    /// Detect the format from the filename extension, case-insensitively.
    /// Anything outside the accepted set fails before any decode attempt.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ParseError::UnsupportedExtension { extension }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Parse a file into raw rows.
///
/// A successfully decoded zero-row document is not an error here; rejecting
/// empty batches with a user-facing message is the caller's job, so the
/// handling is uniform across formats.
pub fn parse_file(path: &Path, progress: Option<ProgressFn<'_>>) -> Result<Vec<RawRow>, ParseError> {
    let format = FileFormat::from_path(path)?;

    let size = std::fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(ParseError::FileTooLarge {
            size,
            limit: MAX_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path)?;
    let rows = parse_str(format, &content, progress)?;
    info!(
        "parsed {} rows from {} ({} bytes)",
        rows.len(),
        path.display(),
        size
    );
    Ok(rows)
}

/// Parse already-loaded content in the given format.
pub fn parse_str(
    format: FileFormat,
    content: &str,
    mut progress: Option<ProgressFn<'_>>,
) -> Result<Vec<RawRow>, ParseError> {
    debug!("decoding import content as {:?}", format);
    let rows = match format {
        // CSV decodes row by row and can report incremental progress.
        FileFormat::Csv => csv::parse(content, &mut progress)?,
        // JSON and YAML are whole-document decoders.
        FileFormat::Json => json::parse(content)?,
        FileFormat::Yaml => yaml::parse(content)?,
    };
    if let Some(report) = progress.as_deref_mut() {
        report(1.0);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(
            FileFormat::from_path(Path::new("data.CSV")).unwrap(),
            FileFormat::Csv
        );
        assert_eq!(
            FileFormat::from_path(Path::new("labels.Json")).unwrap(),
            FileFormat::Json
        );
        assert_eq!(
            FileFormat::from_path(Path::new("subs.yml")).unwrap(),
            FileFormat::Yaml
        );
    }

    #[test]
    fn test_unknown_extension_rejected_before_reading() {
        let err = FileFormat::from_path(Path::new("data.xml")).unwrap_err();
        match err {
            ParseError::UnsupportedExtension { extension } => assert_eq!(extension, "xml"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_oversized_file_fails_fast() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let chunk = vec![b'a'; 1024 * 1024];
        for _ in 0..11 {
            file.write_all(&chunk).unwrap();
        }
        file.flush().unwrap();

        let err = parse_file(file.path(), None).unwrap_err();
        assert!(matches!(err, ParseError::FileTooLarge { .. }));
    }

    #[test]
    fn test_empty_document_is_not_a_parser_error() {
        let rows = parse_str(FileFormat::Json, "[]", None).unwrap();
        assert!(rows.is_empty());
        let rows = parse_str(FileFormat::Csv, "name,color\n", None).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_progress_reaches_completion() {
        let mut fractions = Vec::new();
        let mut report = |f: f32| fractions.push(f);
        parse_str(
            FileFormat::Csv,
            "name,color\nA,#111111\nB,#222222\n",
            Some(&mut report),
        )
        .unwrap();
        assert_eq!(fractions.last().copied(), Some(1.0));
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    }
}
