use crate::cli::Outcome;
use crate::infra::{build_engine, read_record};
use clap::Args;
use marketplace_guard::config::AppConfig;
use marketplace_guard::error::AppError;
use marketplace_guard::validation::{ValidationEngine, ValidationResult};
use marketplace_guard::Record;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Entity kind: user, job, application or company
    #[arg(long)]
    pub(crate) entity: String,
    /// JSON file holding the record (reads stdin when omitted)
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Pretty-print the result
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<Outcome, AppError> {
    let config = AppConfig::load()?;
    let engine = build_engine(&config.validation)?;
    let record = read_record(args.file.as_deref())?;

    let result = validate_record(&engine, &record, &args.entity);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");

    Ok(outcome_for(&result))
}

fn validate_record(engine: &ValidationEngine, record: &Record, entity: &str) -> ValidationResult {
    engine.validate_form(record, entity)
}

fn outcome_for(result: &ValidationResult) -> Outcome {
    if result.is_valid() {
        Outcome::Completed
    } else {
        Outcome::Rejected
    }
}
