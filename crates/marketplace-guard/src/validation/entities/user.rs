use std::borrow::Cow;

use serde_json::json;

use super::{run, EntityPass};
use crate::validation::domain::{ErrorKind, Record, ValidationError, ValidationResult};
use crate::validation::password::contains_personal_info;
use crate::validation::primitives::{coerce_text, not_text};
use crate::validation::rules::EntityKind;
use crate::validation::ValidationEngine;

pub(crate) fn validate(engine: &ValidationEngine, record: &Record) -> ValidationResult {
    run(engine, EntityKind::User, record, |pass| {
        reject_disposable_email(pass);
        check_password(pass);
    })
}

fn email_parts(email: &str) -> Option<(&str, &str)> {
    let (local, domain) = email.trim().rsplit_once('@')?;
    Some((local, domain))
}

fn reject_disposable_email(pass: &mut EntityPass<'_>) {
    let Some(domain) = pass
        .filled("email")
        .and_then(|field| field.stored_text())
        .and_then(email_parts)
        .map(|(_, domain)| domain.to_ascii_lowercase())
    else {
        return;
    };

    if pass.engine.rules.is_disposable_domain(&domain) {
        pass.push(
            ValidationError::new(
                ErrorKind::BusinessRule,
                "email",
                "Disposable email addresses are not allowed",
            )
            .with_actual(domain),
        );
    }
}

/// Strength failures collapse into one `format` error; reuse of a personal detail is a
/// separate `business_rule` error.
fn check_password(pass: &mut EntityPass<'_>) {
    let Some(field) = pass.filled("password") else {
        return;
    };
    let Some(password) = coerce_text(field.raw).map(Cow::into_owned) else {
        if !pass.has_error("password", ErrorKind::Format) {
            pass.push(not_text("password"));
        }
        return;
    };

    let strength = pass.engine.rules.password.assess(&password);
    if let Some(summary) = strength.summary() {
        pass.push(
            ValidationError::new(ErrorKind::Format, "password", summary)
                .with_actual(json!({ "score": strength.score }))
                .with_expected(strength.unmet.clone()),
        );
    }

    let first_name = text_of(pass, "firstName");
    let last_name = text_of(pass, "lastName");
    let local_part = text_of(pass, "email")
        .as_deref()
        .and_then(email_parts)
        .map(|(local, _)| local.to_string());

    let details: Vec<&str> = [&first_name, &last_name, &local_part]
        .into_iter()
        .filter_map(|detail| detail.as_deref())
        .collect();

    if contains_personal_info(&password, &details) {
        pass.push(ValidationError::new(
            ErrorKind::BusinessRule,
            "password",
            "Password must not contain your name or email address",
        ));
    }
}

fn text_of(pass: &EntityPass<'_>, name: &str) -> Option<String> {
    pass.filled(name)
        .and_then(|field| field.stored_text())
        .map(str::to_string)
}
