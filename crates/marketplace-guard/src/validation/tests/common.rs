use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::validation::domain::Record;
use crate::validation::{FixedClock, ValidationEngine};

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0)
        .single()
        .expect("valid instant")
}

pub(crate) fn engine() -> ValidationEngine {
    ValidationEngine::standard()
        .expect("standard engine builds")
        .with_clock(Arc::new(FixedClock(now())))
}

pub(crate) fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other:?}"),
    }
}

pub(crate) fn user_record() -> Record {
    record(json!({
        "firstName": "Aroha",
        "lastName": "Ngata",
        "email": "aroha.ngata@example.co.nz",
        "phone": "021 123 4567",
        "bio": "Product designer moving back to Wellington.",
        "age": 29,
        "userType": "job_seeker",
        "password": "Pohutukawa#88"
    }))
}

pub(crate) fn job_record() -> Record {
    record(json!({
        "title": "Senior Rust Engineer",
        "company": "Kauri Labs",
        "description": "We are hiring a Rust engineer to build payment services for small businesses.",
        "location": "Wellington",
        "type": "full-time",
        "salaryMin": 110000,
        "salaryMax": 140000,
        "applicationDeadline": "2026-12-01"
    }))
}

pub(crate) fn application_record() -> Record {
    record(json!({
        "jobId": "job_1",
        "candidateName": "Jane Smith",
        "candidateEmail": "jane@example.com",
        "candidatePhone": "09 555 1234",
        "coverLetter": "I have built payment integrations for five years and would love to join your team.",
        "experience": "Five years at a Wellington fintech"
    }))
}

pub(crate) fn company_record() -> Record {
    record(json!({
        "name": "Kauri Labs",
        "industry": "Software",
        "description": "Payments tooling for small New Zealand businesses.",
        "website": "https://kaurilabs.co.nz",
        "email": "hello@kaurilabs.co.nz",
        "phone": "+64 4 555 0100",
        "address": "12 Queen Street, Auckland",
        "postalCode": "1010",
        "companyNumber": "12345678",
        "taxNumber": "123456789",
        "employeeCount": 25,
        "foundedYear": 2015
    }))
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
