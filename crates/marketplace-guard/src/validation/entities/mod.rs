//! Entity validators and the pass they share.
//!
//! Every entity runs the same pipeline over its rule table: required fields, then
//! per-field length / format / range checks in table order, then the entity's own
//! cross-field rules, then a threat scan of every known string field. The sanitized
//! `data` copy is built regardless of the outcome; keys outside the table are cleaned
//! there but never validated.

pub(crate) mod application;
pub(crate) mod company;
pub(crate) mod job;
pub(crate) mod user;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::domain::{ErrorKind, Record, ValidationError, ValidationResult};
use super::primitives::{self, coerce_text, not_text};
use super::rules::{EntityKind, EntityRules, FieldFormat, FieldRule};
use super::sanitizer::SanitizeOptions;
use super::ValidationEngine;

/// A present field with its raw, cleaned (stripped) and stored (stripped + clamped) forms.
pub(crate) struct PreparedField<'a> {
    pub rule: &'a FieldRule,
    pub raw: &'a Value,
    pub cleaned: Value,
    pub stored: Value,
}

impl PreparedField<'_> {
    fn is_blank(&self) -> bool {
        primitives::is_blank(Some(&self.cleaned))
    }

    pub fn stored_text(&self) -> Option<&str> {
        self.stored.as_str()
    }
}

/// Mutable state for a single validation call.
pub(crate) struct EntityPass<'a> {
    pub engine: &'a ValidationEngine,
    pub kind: EntityKind,
    pub record: &'a Record,
    pub now: DateTime<Utc>,
    pub fields: Vec<PreparedField<'a>>,
    pub errors: Vec<ValidationError>,
}

impl<'a> EntityPass<'a> {
    fn new(engine: &'a ValidationEngine, kind: EntityKind, record: &'a Record) -> Self {
        let rules = engine.rules.entity(kind);
        let fields = rules
            .fields
            .iter()
            .filter_map(|rule| {
                let raw = record.get(&rule.name)?;
                Some(engine.prepare(rule, raw))
            })
            .collect();

        Self {
            engine,
            kind,
            record,
            now: engine.clock.now(),
            fields,
            errors: Vec::new(),
        }
    }

    fn rules(&self) -> &'a EntityRules {
        self.engine.rules.entity(self.kind)
    }

    pub fn field(&self, name: &str) -> Option<&PreparedField<'a>> {
        self.fields.iter().find(|field| field.rule.name == name)
    }

    /// Field present with a non-blank value.
    pub fn filled(&self, name: &str) -> Option<&PreparedField<'a>> {
        self.field(name).filter(|field| !field.is_blank())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    fn check_required(&mut self) {
        for name in &self.rules().required {
            let cleaned = self.field(name).map(|field| &field.cleaned);
            if let Err(error) = primitives::required(cleaned, name) {
                self.errors.push(error);
            }
        }
    }

    fn check_fields(&mut self) {
        let mut found = Vec::new();
        for field in self.fields.iter().filter(|field| !field.is_blank()) {
            found.extend(self.engine.check_field(field, self.now));
        }
        self.errors.extend(found);
    }

    fn scan_threats(&mut self) {
        let mut found = Vec::new();
        for field in &self.fields {
            let Value::String(raw) = field.raw else {
                continue;
            };
            let threats = self.engine.scanner.scan(raw);
            if threats.is_empty() {
                continue;
            }

            warn!(
                entity = %self.kind,
                field = %field.rule.name,
                threats = ?threats,
                "rejected injected content"
            );
            found.push(
                ValidationError::new(
                    ErrorKind::Security,
                    field.rule.name.as_str(),
                    format!("{} contains potentially malicious content", field.rule.name),
                )
                .with_threats(threats),
            );
        }
        self.errors.extend(found);
    }

    pub fn has_error(&self, field: &str, kind: ErrorKind) -> bool {
        self.errors
            .iter()
            .any(|error| error.field == field && error.kind == kind)
    }

    /// Known string fields keep their stored form; unknown string keys are sanitized with
    /// the default options but never checked.
    fn finish(self) -> ValidationResult {
        let rules = self.rules();
        let loose = SanitizeOptions {
            max_length: self.engine.rules.default_max_length,
            allow_html: false,
        };

        let mut data = self.record.clone();
        for (key, value) in data.iter_mut() {
            if rules.field(key).is_some() {
                continue;
            }
            if let Value::String(text) = value {
                *text = self.engine.sanitizer.sanitize(text, loose);
            }
        }
        for field in &self.fields {
            if field.raw.is_string() && !field.rule.format.is_verbatim() {
                data.insert(field.rule.name.clone(), field.stored.clone());
            }
        }

        debug!(
            entity = %self.kind,
            errors = self.errors.len(),
            "validated record"
        );
        ValidationResult::from_parts(self.errors, data)
    }
}

/// Drive the shared pipeline, slotting `cross_rules` in before the threat scan.
pub(crate) fn run<F>(
    engine: &ValidationEngine,
    kind: EntityKind,
    record: &Record,
    cross_rules: F,
) -> ValidationResult
where
    F: FnOnce(&mut EntityPass<'_>),
{
    let mut pass = EntityPass::new(engine, kind, record);
    pass.check_required();
    pass.check_fields();
    cross_rules(&mut pass);
    pass.scan_threats();
    pass.finish()
}

impl ValidationEngine {
    fn prepare<'a>(&self, rule: &'a FieldRule, raw: &'a Value) -> PreparedField<'a> {
        let (cleaned, stored) = match raw {
            Value::String(text) if !rule.format.is_verbatim() => {
                let cleaned = self.sanitizer.strip(text, rule.allow_html);
                let stored = super::sanitizer::clamp(&cleaned, self.rules.max_length_for(rule));
                (Value::String(cleaned), Value::String(stored))
            }
            other => (other.clone(), other.clone()),
        };

        PreparedField {
            rule,
            raw,
            cleaned,
            stored,
        }
    }

    /// Length, then format, then range, collecting every failure.
    fn check_field(&self, field: &PreparedField<'_>, now: DateTime<Utc>) -> Vec<ValidationError> {
        let rule = field.rule;
        let name = rule.name.as_str();
        let mut errors = Vec::new();

        if rule.min_length.is_some() || rule.max_length.is_some() {
            if let Err(error) =
                primitives::length(&field.cleaned, rule.min_length, rule.max_length, name)
            {
                errors.push(error);
            }
        }

        match rule.format {
            FieldFormat::Text | FieldFormat::Password => {}
            FieldFormat::Choice => {
                if let Err(error) = primitives::one_of(&field.stored, &rule.allowed, name) {
                    errors.push(error);
                }
            }
            FieldFormat::Url => {
                if let Err(error) = check_url(&field.stored, name) {
                    errors.push(error);
                }
            }
            FieldFormat::Date => {
                if let Err(error) = parse_instant(&field.stored, name) {
                    errors.push(error);
                }
            }
            FieldFormat::Number => {
                if let Err(error) = primitives::range(field.raw, rule.min, rule.max, name) {
                    errors.push(error);
                }
            }
            FieldFormat::Year => {
                let upper = f64::from(now.year());
                if let Err(error) = primitives::range(field.raw, rule.min, Some(upper), name) {
                    errors.push(error);
                }
            }
            FieldFormat::Email
            | FieldFormat::Phone
            | FieldFormat::PostalCode
            | FieldFormat::TaxId
            | FieldFormat::CompanyId
            | FieldFormat::StreetAddress => {
                if let Some(kind) = rule.format.pattern_kind() {
                    for error in self.patterns.check(kind, &field.stored, name) {
                        let repeated = errors.iter().any(|existing: &ValidationError| {
                            existing.kind == error.kind && existing.message == error.message
                        });
                        if !repeated {
                            errors.push(error);
                        }
                    }
                }
            }
        }

        errors
    }
}

pub(crate) fn check_url(value: &Value, field: &str) -> primitives::Check {
    let text = coerce_text(value).ok_or_else(|| not_text(field))?;
    match url::Url::parse(text.trim()) {
        Ok(_) => Ok(()),
        Err(err) => Err(ValidationError::new(
            ErrorKind::Format,
            field,
            format!("{field} must be a valid URL ({err})"),
        )
        .with_actual(text.into_owned())),
    }
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_instant(value: &Value, field: &str) -> Result<DateTime<Utc>, ValidationError> {
    let text = coerce_text(value).ok_or_else(|| not_text(field))?;
    let trimmed = text.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| {
            ValidationError::new(
                ErrorKind::Format,
                field,
                format!("{field} must be a date (YYYY-MM-DD) or RFC 3339 timestamp"),
            )
            .with_actual(trimmed.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_instant_accepts_dates_and_timestamps() {
        let date = parse_instant(&json!("2026-11-01"), "deadline").expect("date parses");
        assert_eq!(date.to_rfc3339(), "2026-11-01T00:00:00+00:00");

        let stamp =
            parse_instant(&json!("2026-11-01T09:30:00+13:00"), "deadline").expect("rfc3339");
        assert_eq!(stamp.to_rfc3339(), "2026-10-31T20:30:00+00:00");

        let error = parse_instant(&json!("next friday"), "deadline").expect_err("not a date");
        assert_eq!(error.kind, ErrorKind::Format);
    }

    #[test]
    fn check_url_requires_absolute_url() {
        assert!(check_url(&json!("https://acme.co.nz/careers"), "website").is_ok());
        let error = check_url(&json!("not a url"), "website").expect_err("relative");
        assert_eq!(error.kind, ErrorKind::Format);
        assert_eq!(error.field, "website");
    }
}
