//! Per-record outcome types: coercion results, validation errors and the
//! parsed record wrapper the preview/import layers consume.

use serde::Serialize;

/// Outcome of mapping one source field.
///
/// Unparsable values keep the original text instead of being dropped, so
/// validation can name the offending value in its message.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue<T> {
    #[default]
    Missing,
    /// Present but not coercible; carries the raw source text.
    Invalid(String),
    Value(T),
}

impl<T> FieldValue<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn is_present(&self) -> bool {
        !self.is_missing()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn invalid_raw(&self) -> Option<&str> {
        match self {
            Self::Invalid(raw) => Some(raw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A field-level validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// One row from the source file after mapping and validation.
///
/// `index` is the zero-based position in the parsed sequence and is the
/// stable identity used for selection, status tracking and retry.
#[derive(Debug, Clone)]
pub struct ParsedImportRecord<T> {
    pub index: usize,
    pub data: T,
    pub validation_errors: Vec<ValidationError>,
}

impl<T> ParsedImportRecord<T> {
    /// True iff no validation entry has severity [`Severity::Error`].
    /// Derived rather than stored, so it cannot drift from the error list.
    pub fn is_valid(&self) -> bool {
        !self
            .validation_errors
            .iter()
            .any(|e| e.severity == Severity::Error)
    }
}
