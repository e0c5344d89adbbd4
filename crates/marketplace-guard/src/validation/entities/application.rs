use super::run;
use crate::validation::domain::{Record, ValidationResult};
use crate::validation::rules::EntityKind;
use crate::validation::ValidationEngine;

/// Applications carry no cross-field rules; the rule table covers everything.
pub(crate) fn validate(engine: &ValidationEngine, record: &Record) -> ValidationResult {
    run(engine, EntityKind::Application, record, |_| {})
}
