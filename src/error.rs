//! Error types for the import pipeline boundary.
//!
//! Parse-stage failures are fatal for the selected file and carry enough
//! detail (line numbers where the format provides them) for actionable
//! messages. Submission failures are per-record and never abort the batch.

use std::fmt;

use thiserror::Error;

/// One granular decode failure, with a 1-based line number when the
/// underlying format can report one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntry {
    pub line: Option<usize>,
    pub message: String,
}

impl ParseEntry {
    pub fn new(line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Failure while turning a file into raw rows.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The filename's extension is not one of .csv, .json, .yaml, .yml.
    /// Raised before any content is read.
    #[error("unsupported import format '.{extension}' (expected .csv, .json, .yaml or .yml)")]
    UnsupportedExtension { extension: String },

    /// The file exceeds the import size ceiling. Raised from file metadata,
    /// before reading the content.
    #[error("file is {size} bytes, over the {limit} byte import limit; split it into smaller files")]
    FileTooLarge { size: u64, limit: u64 },

    /// Structural decode failure with zero or more line-level entries.
    #[error("could not decode import file: {}", format_entries(.entries))]
    Structural { entries: Vec<ParseEntry> },

    #[error("could not read import file: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            entries: vec![ParseEntry::new(None, message)],
        }
    }

    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self::Structural {
            entries: vec![ParseEntry::new(Some(line), message)],
        }
    }

    /// Line-level entries, empty for non-structural failures.
    pub fn entries(&self) -> &[ParseEntry] {
        match self {
            Self::Structural { entries } => entries,
            _ => &[],
        }
    }
}

fn format_entries(entries: &[ParseEntry]) -> String {
    if entries.is_empty() {
        return "no detail available".to_string();
    }
    let mut out = entries[0].to_string();
    if entries.len() > 1 {
        out.push_str(&format!(" (and {} more)", entries.len() - 1));
    }
    out
}

/// Rejection from a create-mutation. `conflict` marks the duplicate/
/// already-exists case so callers can account for it as skipped rather
/// than failed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
    pub conflict: bool,
}

impl SubmitError {
    pub fn failure(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "import request failed".to_string();
        }
        Self {
            message,
            conflict: false,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conflict: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_reports_first_line() {
        let err = ParseError::Structural {
            entries: vec![
                ParseEntry::new(Some(3), "expected 4 columns, found 2"),
                ParseEntry::new(Some(7), "unterminated quote"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "got: {msg}");
        assert!(msg.contains("1 more"), "got: {msg}");
    }

    #[test]
    fn test_empty_submit_message_gets_generic_fallback() {
        let err = SubmitError::failure("   ");
        assert_eq!(err.message, "import request failed");
        assert!(!err.conflict);
    }
}
