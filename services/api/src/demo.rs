use chrono::{DateTime, Utc};
use clap::Args;
use marketplace_guard::error::AppError;
use marketplace_guard::validation::{
    EntityKind, FixedClock, Record, SanitizeOptions, ValidationEngine, ValidationResult,
};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pin "now" for deadline and founded-year rules (RFC 3339). Defaults to the system clock.
    #[arg(long, value_parser = parse_now)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print every result as JSON instead of a summary.
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as RFC 3339 ({err})"))
}

struct Submission {
    title: &'static str,
    kind: EntityKind,
    record: Value,
}

fn submissions() -> Vec<Submission> {
    vec![
        Submission {
            title: "Seeker signing up with a throwaway inbox",
            kind: EntityKind::User,
            record: json!({
                "firstName": "Jo",
                "lastName": "Lee",
                "email": "jo@mailinator.com",
                "userType": "job_seeker"
            }),
        },
        Submission {
            title: "Rushed job listing with inverted salary band",
            kind: EntityKind::Job,
            record: json!({
                "title": "Dev",
                "company": "Acme",
                "description": "x".repeat(10),
                "location": "Auckland",
                "type": "full-time",
                "salaryMin": 90000,
                "salaryMax": 70000
            }),
        },
        Submission {
            title: "Company profile with a malformed website",
            kind: EntityKind::Company,
            record: json!({
                "name": "Acme",
                "industry": "Tech",
                "website": "not a url"
            }),
        },
        Submission {
            title: "Application carrying a script payload",
            kind: EntityKind::Application,
            record: json!({
                "candidateName": "Jane Smith",
                "candidateEmail": "jane@example.com",
                "jobId": "job_1",
                "coverLetter": format!("<script>alert(1)</script>{}", "x".repeat(100))
            }),
        },
        Submission {
            title: "Minimal seeker profile with a local mobile",
            kind: EntityKind::User,
            record: json!({
                "firstName": "Ann",
                "lastName": "Lee",
                "email": "ann.lee@example.com",
                "userType": "job_seeker",
                "phone": "021 123 4567"
            }),
        },
    ]
}

fn as_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut engine = ValidationEngine::standard()?;
    if let Some(now) = args.now {
        engine = engine.with_clock(Arc::new(FixedClock(now)));
    }

    println!("Marketplace validation demo");
    for submission in submissions() {
        let result = engine.validate(submission.kind, &as_record(submission.record));
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            render_result(submission.title, submission.kind, &result);
        }
    }

    let sample = r#"<p onclick="track()">Great <b>team</b></p><script>steal()</script>"#;
    let sanitized = engine.sanitize(sample, SanitizeOptions::default());
    let threats = engine.detect_threats(sample);
    println!("\nSanitizer");
    println!("- input:     {sample}");
    println!("- sanitized: {sanitized}");
    println!(
        "- threats:   {}",
        threats
            .iter()
            .map(|threat| threat.label())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let strength = engine.assess_password("harbourbridge");
    println!(
        "\nPassword 'harbourbridge' scores {}/6 ({})",
        strength.score,
        strength
            .summary()
            .unwrap_or_else(|| "meets every rule".to_string())
    );

    Ok(())
}

fn render_result(title: &str, kind: EntityKind, result: &ValidationResult) {
    let verdict = if result.is_valid() { "valid" } else { "rejected" };
    let inline = result.field_errors().count();
    let form_level = result.errors().len() - inline;
    println!("\n{title} [{kind}] -> {verdict} ({inline} inline, {form_level} form-level)");
    for error in result.errors() {
        println!("  - {} on {}: {}", error.kind, error.field, error.message);
        if !error.threats.is_empty() {
            let labels: Vec<_> = error.threats.iter().map(|threat| threat.label()).collect();
            println!("    threats: {}", labels.join(", "));
        }
    }
}
