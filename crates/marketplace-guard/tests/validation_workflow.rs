use std::sync::Arc;

use chrono::{TimeZone, Utc};
use marketplace_guard::config::ValidationSettings;
use marketplace_guard::validation::{
    BusinessRules, DomainPatterns, ErrorKind, FixedClock, Record, ThreatKind, ThreatScanner,
    ValidationEngine,
};
use serde_json::{json, Value};

fn engine() -> ValidationEngine {
    let now = Utc
        .with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
        .single()
        .expect("valid instant");
    ValidationEngine::standard()
        .expect("standard engine builds")
        .with_clock(Arc::new(FixedClock(now)))
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn disposable_email_is_the_only_user_error() {
    let result = engine().validate_user(&record(json!({
        "firstName": "Jo",
        "lastName": "Lee",
        "email": "jo@mailinator.com",
        "userType": "job_seeker"
    })));

    assert!(!result.is_valid());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].kind, ErrorKind::BusinessRule);
    assert_eq!(result.errors()[0].field, "email");
}

#[test]
fn short_job_fields_and_inverted_salary_are_all_reported() {
    let result = engine().validate_job(&record(json!({
        "title": "Dev",
        "company": "Acme",
        "description": "x".repeat(10),
        "location": "Auckland",
        "type": "full-time",
        "salaryMin": 90000,
        "salaryMax": 70000
    })));

    assert!(!result.is_valid());
    assert!(result.has_error("title", ErrorKind::Length));
    assert!(result.has_error("description", ErrorKind::Length));
    assert!(result.has_error("salary", ErrorKind::BusinessRule));

    let title = result.errors_for("title").next().expect("title error");
    assert_eq!(title.expected, Some(json!({ "min": 5, "max": 100 })));
}

#[test]
fn malformed_website_leaves_other_company_data_unchanged() {
    let result = engine().validate_company(&record(json!({
        "name": "Acme",
        "industry": "Tech",
        "website": "not a url"
    })));

    assert!(!result.is_valid());
    assert!(result.has_error("website", ErrorKind::Format));
    assert_eq!(result.data["name"], json!("Acme"));
}

#[test]
fn script_in_cover_letter_is_a_security_error_and_stripped() {
    let result = engine().validate_application(&record(json!({
        "candidateName": "Jane Smith",
        "candidateEmail": "jane@example.com",
        "jobId": "job_1",
        "coverLetter": format!("<script>alert(1)</script>{}", "x".repeat(100))
    })));

    assert!(!result.is_valid());
    let security = result
        .errors_for("coverLetter")
        .find(|error| error.kind == ErrorKind::Security)
        .expect("security error on cover letter");
    assert_eq!(security.threats, vec![ThreatKind::ScriptInjection]);

    let stored = result.data["coverLetter"]
        .as_str()
        .expect("cover letter stored as text");
    assert!(!stored.contains("<script>"));
    assert_eq!(stored, "x".repeat(100));
}

#[test]
fn minimal_user_with_local_mobile_is_valid() {
    let result = engine().validate_user(&record(json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "email": "ann.lee@example.com",
        "userType": "job_seeker",
        "phone": "021 123 4567"
    })));

    assert!(result.is_valid(), "{:?}", result.errors());
    assert!(result.errors().is_empty());
}

#[test]
fn deployment_settings_shorten_the_deadline_window() {
    let settings = ValidationSettings {
        max_deadline_days: 14,
        ..ValidationSettings::default()
    };
    let now = Utc
        .with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
        .single()
        .expect("valid instant");
    let engine = ValidationEngine::from_settings(&settings)
        .expect("engine builds")
        .with_clock(Arc::new(FixedClock(now)));

    let job = record(json!({
        "title": "Barista",
        "company": "Flat White Co",
        "description": "Morning shifts pulling shots for the Cuba Street crowd, training provided.",
        "location": "Wellington",
        "type": "part-time",
        "applicationDeadline": "2026-11-20"
    }));

    let result = engine.validate_job(&job);
    let error = result
        .errors_for("applicationDeadline")
        .next()
        .expect("deadline rejected");
    assert_eq!(
        error.message,
        "Application deadline cannot be more than 14 days in the future"
    );
    assert!(crate::engine().validate_job(&job).is_valid());
}

#[test]
fn swapped_rule_tables_are_verified_on_construction() {
    let mut rules = BusinessRules::standard();
    rules.max_deadline_days = 0;
    let built = ValidationEngine::new(
        rules,
        DomainPatterns::new_zealand().expect("patterns compile"),
        ThreatScanner::standard().expect("threats compile"),
    );
    assert!(built.is_err());
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let result = engine.validate_form(
                    &record(json!({
                        "name": format!("Worker {worker} Ltd"),
                        "industry": "Logistics"
                    })),
                    "company",
                );
                result.is_valid()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("worker finished"));
    }
}
