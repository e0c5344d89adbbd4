use super::common::*;
use serde_json::json;

use crate::validation::domain::ErrorKind;
use crate::validation::forms::{JobForm, UserForm};
use crate::validation::rules::EntityKind;

#[test]
fn validate_form_forwards_known_tags_case_insensitively() {
    let engine = engine();
    let direct = engine.validate_company(&company_record());
    let dispatched = engine.validate_form(&company_record(), "Company");
    assert_eq!(direct, dispatched);
}

#[test]
fn validate_form_reports_unknown_tag_as_single_format_error() {
    let record = record(json!({ "amount": 120, "note": "<b>kept as is</b>" }));
    let result = engine().validate_form(&record, "invoice");

    assert!(!result.is_valid());
    assert_eq!(result.errors().len(), 1);
    let error = &result.errors()[0];
    assert_eq!(error.kind, ErrorKind::Format);
    assert_eq!(error.field, "entityType");
    assert_eq!(error.actual, Some(json!("invoice")));
    assert_eq!(
        error.expected,
        Some(json!(["user", "job", "application", "company"]))
    );
    assert_eq!(result.data, record);
}

#[test]
fn every_entity_kind_accepts_its_fixture() {
    let engine = engine();
    for (kind, fixture) in [
        (EntityKind::User, user_record()),
        (EntityKind::Job, job_record()),
        (EntityKind::Application, application_record()),
        (EntityKind::Company, company_record()),
    ] {
        let result = engine.validate(kind, &fixture);
        assert!(result.is_valid(), "{kind}: {:?}", result.errors());
    }
}

#[test]
fn required_errors_come_first_then_field_order() {
    let result = engine().validate_job(&record(json!({
        "title": "Dev",
        "type": "gig",
        "salaryMin": -5
    })));

    let order: Vec<_> = result
        .errors()
        .iter()
        .map(|error| (error.field.as_str(), error.kind))
        .collect();
    assert_eq!(
        order,
        vec![
            ("company", ErrorKind::Required),
            ("description", ErrorKind::Required),
            ("location", ErrorKind::Required),
            ("title", ErrorKind::Length),
            ("type", ErrorKind::Format),
            ("salaryMin", ErrorKind::Range),
        ]
    );
}

#[test]
fn whitespace_only_required_field_counts_as_missing() {
    let mut user = user_record();
    user.insert("firstName".to_string(), json!("   "));
    let result = engine().validate_user(&user);
    assert!(result.has_error("firstName", ErrorKind::Required));
    assert!(!result.has_error("firstName", ErrorKind::Length));
}

#[test]
fn markup_only_required_field_counts_as_missing() {
    let mut user = user_record();
    user.insert("lastName".to_string(), json!("<b></b>"));
    let result = engine().validate_user(&user);
    assert!(result.has_error("lastName", ErrorKind::Required));
}

#[test]
fn uncoercible_values_become_format_errors() {
    let mut user = user_record();
    user.insert("bio".to_string(), json!({ "text": "nested" }));
    user.insert("age".to_string(), json!(["29"]));
    let result = engine().validate_user(&user);
    assert!(result.has_error("bio", ErrorKind::Format));
    assert!(result.has_error("age", ErrorKind::Format));
    assert_eq!(result.data["bio"], json!({ "text": "nested" }));
}

#[test]
fn unknown_keys_are_cleaned_without_affecting_validity() {
    let mut company = company_record();
    company.insert("linkedin".to_string(), json!("<i>kauri-labs</i>"));
    company.insert("staffCount".to_string(), json!(42));
    let result = engine().validate_company(&company);
    assert!(result.is_valid());
    assert_eq!(result.data["linkedin"], json!("kauri-labs"));
    assert_eq!(result.data["staffCount"], json!(42));
}

#[test]
fn unknown_key_scripts_never_reach_data() {
    let mut user = user_record();
    user.insert(
        "nickname".to_string(),
        json!("<script>alert(1)</script>Ann"),
    );
    let result = engine().validate_user(&user);
    assert!(result.is_valid(), "{:?}", result.errors());
    assert_eq!(result.data["nickname"], json!("Ann"));

    let again = engine().validate_user(&result.data);
    assert_eq!(again.data["nickname"], json!("Ann"));
}

#[test]
fn typed_forms_validate_like_records() {
    let engine = engine();
    let user = UserForm {
        first_name: Some("Ann".to_string()),
        last_name: Some("Lee".to_string()),
        email: Some("ann.lee@example.com".to_string()),
        user_type: Some("employer".to_string()),
        age: Some(15),
        ..UserForm::default()
    };
    let result = engine.validate_user(&user.into_record());
    assert_eq!(result.errors().len(), 1);
    assert!(result.has_error("age", ErrorKind::Range));

    let job = JobForm {
        title: Some("Warehouse Supervisor".to_string()),
        company: Some("Tui Freight".to_string()),
        description: Some(
            "Lead a team of six across day shifts at our Hamilton distribution centre.".to_string(),
        ),
        location: Some("Hamilton".to_string()),
        job_type: Some("casual".to_string()),
        application_deadline: Some("2026-11-15".to_string()),
        ..JobForm::default()
    };
    assert!(engine.validate_job(&job.into_record()).is_valid());
}

#[test]
fn clamps_stored_text_to_field_maximum() {
    let mut user = user_record();
    user.insert("bio".to_string(), json!("a".repeat(520)));
    let result = engine().validate_user(&user);
    assert!(result.has_error("bio", ErrorKind::Length));
    let stored = result.data["bio"].as_str().expect("bio stored as text");
    assert_eq!(stored.chars().count(), 500);
}
