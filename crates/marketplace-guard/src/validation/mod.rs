//! Input validation and business rules for marketplace records.
//!
//! `ValidationEngine` bundles the read-only rule tables, the compiled domain patterns,
//! the sanitizer and threat scanner, and a clock. It is cheap to clone and safe to share
//! across request handlers.

pub mod clock;
pub mod domain;
mod entities;
pub mod forms;
pub mod password;
pub mod patterns;
pub mod primitives;
pub mod router;
pub mod rules;
pub mod sanitizer;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{ErrorKind, Record, ThreatKind, ValidationError, ValidationResult};
pub use forms::{ApplicationForm, CompanyForm, JobForm, UserForm};
pub use password::{PasswordPolicy, PasswordStrength};
pub use patterns::{DomainPatterns, PatternKind, PatternSpec};
pub use router::validation_router;
pub use rules::{BusinessRules, EntityKind, FieldFormat, FieldRule, RuleConfigError};
pub use sanitizer::{SanitizeOptions, Sanitizer, ThreatPattern, ThreatScanner};

use crate::config::ValidationSettings;

#[derive(Clone)]
pub struct ValidationEngine {
    rules: Arc<BusinessRules>,
    patterns: Arc<DomainPatterns>,
    sanitizer: Arc<Sanitizer>,
    scanner: Arc<ThreatScanner>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("patterns", &self.patterns)
            .field("scanner", &self.scanner)
            .field("max_deadline_days", &self.rules.max_deadline_days)
            .finish_non_exhaustive()
    }
}

impl ValidationEngine {
    /// Verify the rule table and bind it to compiled patterns. Uses the system clock.
    pub fn new(
        rules: BusinessRules,
        patterns: DomainPatterns,
        scanner: ThreatScanner,
    ) -> Result<Self, RuleConfigError> {
        rules.verify()?;
        Ok(Self {
            rules: Arc::new(rules),
            patterns: Arc::new(patterns),
            sanitizer: Arc::new(Sanitizer::new()?),
            scanner: Arc::new(scanner),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn standard() -> Result<Self, RuleConfigError> {
        Self::new(
            BusinessRules::standard(),
            DomainPatterns::new_zealand()?,
            ThreatScanner::standard()?,
        )
    }

    pub fn from_settings(settings: &ValidationSettings) -> Result<Self, RuleConfigError> {
        Self::new(
            BusinessRules::from_settings(settings),
            DomainPatterns::new_zealand()?,
            ThreatScanner::standard()?,
        )
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn rules(&self) -> &BusinessRules {
        &self.rules
    }

    pub fn patterns(&self) -> &DomainPatterns {
        &self.patterns
    }

    pub fn validate_user(&self, record: &Record) -> ValidationResult {
        entities::user::validate(self, record)
    }

    pub fn validate_job(&self, record: &Record) -> ValidationResult {
        entities::job::validate(self, record)
    }

    pub fn validate_application(&self, record: &Record) -> ValidationResult {
        entities::application::validate(self, record)
    }

    pub fn validate_company(&self, record: &Record) -> ValidationResult {
        entities::company::validate(self, record)
    }

    pub fn validate(&self, kind: EntityKind, record: &Record) -> ValidationResult {
        match kind {
            EntityKind::User => self.validate_user(record),
            EntityKind::Job => self.validate_job(record),
            EntityKind::Application => self.validate_application(record),
            EntityKind::Company => self.validate_company(record),
        }
    }

    /// Dispatch on a free-form entity tag. An unknown tag yields a single format error on
    /// `entityType` and echoes the record back untouched.
    pub fn validate_form(&self, record: &Record, entity_tag: &str) -> ValidationResult {
        match entity_tag.parse::<EntityKind>() {
            Ok(kind) => self.validate(kind, record),
            Err(reason) => {
                debug!(entity_tag, %reason, "rejected unknown entity type");
                let error = ValidationError::new(
                    ErrorKind::Format,
                    "entityType",
                    format!("Unknown entity type: {entity_tag}"),
                )
                .with_actual(Value::String(entity_tag.to_string()))
                .with_expected(
                    EntityKind::ALL
                        .iter()
                        .map(|kind| kind.label())
                        .collect::<Vec<_>>(),
                );
                ValidationResult::from_parts(vec![error], record.clone())
            }
        }
    }

    pub fn sanitize(&self, raw: &str, options: SanitizeOptions) -> String {
        self.sanitizer.sanitize(raw, options)
    }

    pub fn detect_threats(&self, raw: &str) -> Vec<ThreatKind> {
        self.scanner.scan(raw)
    }

    pub fn assess_password(&self, password: &str) -> PasswordStrength {
        self.rules.password.assess(password)
    }
}
