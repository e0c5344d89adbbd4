use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{ErrorKind, ValidationError};
use super::primitives::{self, coerce_text, not_text};
use super::rules::RuleConfigError;

/// Semantic field kinds with a region-specific format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Email,
    PostalCode,
    Phone,
    TaxId,
    CompanyId,
    StreetAddress,
}

/// Uncompiled pattern entry as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub kind: PatternKind,
    pub regex: String,
    pub message: String,
}

impl PatternSpec {
    fn new(kind: PatternKind, regex: &str, message: &str) -> Self {
        Self {
            kind,
            regex: regex.to_string(),
            message: message.to_string(),
        }
    }
}

/// New Zealand formats as used by the marketplace forms. Format only, no checksums.
pub fn new_zealand_table() -> Vec<PatternSpec> {
    vec![
        PatternSpec::new(
            PatternKind::Email,
            r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
            "Please enter a valid email address",
        ),
        PatternSpec::new(
            PatternKind::PostalCode,
            r"^\d{4}$",
            "Please enter a valid 4-digit NZ postal code",
        ),
        PatternSpec::new(
            PatternKind::Phone,
            r"^(\+64|0)[2-9]\d{7,9}$",
            "Please enter a valid NZ phone number",
        ),
        PatternSpec::new(
            PatternKind::TaxId,
            r"^\d{8,9}$",
            "Please enter a valid NZ tax number (8-9 digits)",
        ),
        PatternSpec::new(
            PatternKind::CompanyId,
            r"^\d{8}$",
            "Please enter a valid NZ company number (8 digits)",
        ),
        PatternSpec::new(
            PatternKind::StreetAddress,
            r"^[a-zA-Z0-9\s,.\-]+$",
            "Address may only contain letters, numbers, spaces, commas, periods and hyphens",
        ),
    ]
}

struct CompiledPattern {
    regex: Regex,
    message: String,
}

/// Compiled domain patterns. Built once, then shared read-only.
pub struct DomainPatterns {
    patterns: BTreeMap<PatternKind, CompiledPattern>,
}

impl std::fmt::Debug for DomainPatterns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainPatterns")
            .field("kinds", &self.patterns.keys().collect::<Vec<_>>())
            .finish()
    }
}

const POSTAL_CODE_DIGITS: usize = 4;
const ADDRESS_MIN: usize = 5;
const ADDRESS_MAX: usize = 200;

impl DomainPatterns {
    pub fn compile(table: &[PatternSpec]) -> Result<Self, RuleConfigError> {
        let mut patterns = BTreeMap::new();

        for spec in table {
            let regex = Regex::new(&spec.regex).map_err(|source| RuleConfigError::Pattern {
                name: format!("{:?}", spec.kind),
                source,
            })?;
            patterns.insert(
                spec.kind,
                CompiledPattern {
                    regex,
                    message: spec.message.clone(),
                },
            );
        }

        for kind in [
            PatternKind::Email,
            PatternKind::PostalCode,
            PatternKind::Phone,
            PatternKind::TaxId,
            PatternKind::CompanyId,
            PatternKind::StreetAddress,
        ] {
            if !patterns.contains_key(&kind) {
                return Err(RuleConfigError::MissingPattern(kind));
            }
        }

        Ok(Self { patterns })
    }

    pub fn new_zealand() -> Result<Self, RuleConfigError> {
        Self::compile(&new_zealand_table())
    }

    fn compiled(&self, kind: PatternKind) -> &CompiledPattern {
        // `compile` refuses tables with a missing kind.
        &self.patterns[&kind]
    }

    /// Run the checks for `kind`, returning every failure found.
    pub fn check(&self, kind: PatternKind, value: &Value, field: &str) -> Vec<ValidationError> {
        match kind {
            PatternKind::Email => self.check_email(value, field),
            PatternKind::PostalCode => self.check_postal_code(value, field),
            PatternKind::Phone => self.check_phone(value, field),
            PatternKind::TaxId => self.check_tax_id(value, field),
            PatternKind::CompanyId => self.check_company_id(value, field),
            PatternKind::StreetAddress => self.check_street_address(value, field),
        }
    }

    pub fn check_email(&self, value: &Value, field: &str) -> Vec<ValidationError> {
        self.matches(PatternKind::Email, value, field)
            .err()
            .into_iter()
            .collect()
    }

    pub fn check_postal_code(&self, value: &Value, field: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Err(error) = primitives::length(
            value,
            Some(POSTAL_CODE_DIGITS),
            Some(POSTAL_CODE_DIGITS),
            field,
        ) {
            errors.push(error);
        }
        if let Err(error) = self.matches(PatternKind::PostalCode, value, field) {
            push_unique(&mut errors, error);
        }
        errors
    }

    pub fn check_phone(&self, value: &Value, field: &str) -> Vec<ValidationError> {
        self.matches_compact(PatternKind::Phone, value, field)
            .err()
            .into_iter()
            .collect()
    }

    pub fn check_tax_id(&self, value: &Value, field: &str) -> Vec<ValidationError> {
        self.matches_compact(PatternKind::TaxId, value, field)
            .err()
            .into_iter()
            .collect()
    }

    pub fn check_company_id(&self, value: &Value, field: &str) -> Vec<ValidationError> {
        self.matches_compact(PatternKind::CompanyId, value, field)
            .err()
            .into_iter()
            .collect()
    }

    pub fn check_street_address(&self, value: &Value, field: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if let Err(error) = primitives::length(value, Some(ADDRESS_MIN), Some(ADDRESS_MAX), field) {
            errors.push(error);
        }
        if let Err(error) = self.matches(PatternKind::StreetAddress, value, field) {
            push_unique(&mut errors, error);
        }
        errors
    }

    fn matches(&self, kind: PatternKind, value: &Value, field: &str) -> primitives::Check {
        let compiled = self.compiled(kind);
        primitives::pattern(value, &compiled.regex, field, Some(&compiled.message))
    }

    /// Match after removing every whitespace character.
    fn matches_compact(&self, kind: PatternKind, value: &Value, field: &str) -> primitives::Check {
        let text = coerce_text(value).ok_or_else(|| not_text(field))?;
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        self.matches(kind, &Value::String(compact), field)
            .map_err(|error| error.with_actual(text.into_owned()))
    }
}

/// An uncoercible value yields the same format error from every primitive; report it once.
fn push_unique(errors: &mut Vec<ValidationError>, error: ValidationError) {
    let duplicate = errors
        .iter()
        .any(|existing| existing.kind == ErrorKind::Format && existing.message == error.message);
    if !duplicate {
        errors.push(error);
    }
}
