use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loosely typed key/value record as submitted by a form or API caller.
pub type Record = Map<String, Value>;

/// Closed taxonomy of validation failures.
///
/// `Duplicate` and `Relationship` are reserved for cross-record checks owned by the
/// persistence layer; the engine itself never emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Required,
    Format,
    Length,
    Range,
    BusinessRule,
    Security,
    Duplicate,
    Relationship,
}

impl ErrorKind {
    pub const fn label(self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::Format => "format",
            ErrorKind::Length => "length",
            ErrorKind::Range => "range",
            ErrorKind::BusinessRule => "business_rule",
            ErrorKind::Security => "security",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::Relationship => "relationship",
        }
    }

    /// Errors a form renders inline next to the offending input.
    pub const fn is_field_level(self) -> bool {
        matches!(
            self,
            ErrorKind::Required | ErrorKind::Format | ErrorKind::Length | ErrorKind::Range
        )
    }

    /// Errors that must block submission outright.
    pub const fn blocks_submission(self) -> bool {
        matches!(self, ErrorKind::Security)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Known injection patterns reported by the threat scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    ScriptInjection,
    JsUri,
    EventHandler,
}

impl ThreatKind {
    pub const fn label(self) -> &'static str {
        match self {
            ThreatKind::ScriptInjection => "script_injection",
            ThreatKind::JsUri => "js_uri",
            ThreatKind::EventHandler => "event_handler",
        }
    }
}

impl fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single problem found in a record, keyed by the input field it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub threats: Vec<ThreatKind>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
            actual: None,
            expected: None,
            threats: Vec::new(),
        }
    }

    pub fn with_actual(mut self, actual: impl Into<Value>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_threats(mut self, threats: Vec<ThreatKind>) -> Self {
        self.threats = threats;
        self
    }
}

/// Uniform outcome shared by every entity validator.
///
/// `isValid` is always derived from `errors`; a deserialized result recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ResultParts")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationError>,
    pub data: Record,
}

#[derive(Deserialize)]
struct ResultParts {
    #[serde(default)]
    errors: Vec<ValidationError>,
    #[serde(default)]
    data: Record,
}

impl From<ResultParts> for ValidationResult {
    fn from(parts: ResultParts) -> Self {
        Self::from_parts(parts.errors, parts.data)
    }
}

impl ValidationResult {
    /// Build a result, deriving `is_valid` from the collected errors.
    pub fn from_parts(errors: Vec<ValidationError>, data: Record) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            data,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_parts(self) -> (Vec<ValidationError>, Record) {
        (self.errors, self.data)
    }

    /// Errors that belong next to an input rather than in a form-level banner.
    pub fn field_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|error| error.kind.is_field_level())
    }

    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |error| error.field == field)
    }

    pub fn has_error(&self, field: &str, kind: ErrorKind) -> bool {
        self.errors_for(field).any(|error| error.kind == kind)
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|error| error.kind == kind).count()
    }

    pub fn is_blocked(&self) -> bool {
        self.errors.iter().any(|error| error.kind.blocks_submission())
    }
}
