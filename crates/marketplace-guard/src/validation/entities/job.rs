use chrono::Duration;
use serde_json::json;

use super::{parse_instant, run, EntityPass};
use crate::validation::domain::{ErrorKind, Record, ValidationError, ValidationResult};
use crate::validation::primitives::coerce_number;
use crate::validation::rules::EntityKind;
use crate::validation::ValidationEngine;

pub(crate) fn validate(engine: &ValidationEngine, record: &Record) -> ValidationResult {
    run(engine, EntityKind::Job, record, |pass| {
        check_salary_order(pass);
        check_deadline_window(pass);
    })
}

/// Only fires when both bounds are present and numeric; unreadable bounds are already
/// reported by the range check.
fn check_salary_order(pass: &mut EntityPass<'_>) {
    let bound = |name: &str| {
        pass.filled(name)
            .and_then(|field| coerce_number(field.raw))
    };
    let (Some(min), Some(max)) = (bound("salaryMin"), bound("salaryMax")) else {
        return;
    };

    if max < min {
        pass.push(
            ValidationError::new(
                ErrorKind::BusinessRule,
                "salary",
                "Maximum salary must be greater than or equal to minimum salary",
            )
            .with_actual(json!({ "salaryMin": min, "salaryMax": max })),
        );
    }
}

fn check_deadline_window(pass: &mut EntityPass<'_>) {
    let Some(deadline) = pass
        .filled("applicationDeadline")
        .and_then(|field| parse_instant(&field.stored, "applicationDeadline").ok())
    else {
        return;
    };

    let max_days = pass.engine.rules.max_deadline_days;
    let now = pass.now;
    let latest = Duration::try_days(max_days).and_then(|window| now.checked_add_signed(window));

    if deadline <= now {
        pass.push(
            ValidationError::new(
                ErrorKind::BusinessRule,
                "applicationDeadline",
                "Application deadline must be in the future",
            )
            .with_actual(deadline.to_rfc3339())
            .with_expected(json!({ "after": now.to_rfc3339() })),
        );
    } else if latest.is_some_and(|latest| deadline > latest) {
        pass.push(
            ValidationError::new(
                ErrorKind::BusinessRule,
                "applicationDeadline",
                format!("Application deadline cannot be more than {max_days} days in the future"),
            )
            .with_actual(deadline.to_rfc3339())
            .with_expected(json!({ "maxDays": max_days })),
        );
    }
}
