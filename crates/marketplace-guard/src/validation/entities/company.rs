use super::run;
use crate::validation::domain::{Record, ValidationResult};
use crate::validation::rules::EntityKind;
use crate::validation::ValidationEngine;

/// Website parsing and the founded-year ceiling are driven by the field formats, so the
/// company pass adds nothing beyond the shared pipeline.
pub(crate) fn validate(engine: &ValidationEngine, record: &Record) -> ValidationResult {
    run(engine, EntityKind::Company, record, |_| {})
}
