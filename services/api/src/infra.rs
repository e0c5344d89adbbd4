use marketplace_guard::config::ValidationSettings;
use marketplace_guard::error::AppError;
use marketplace_guard::validation::{Record, ValidationEngine};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the shared engine once; rule tables are verified before anything is served.
pub(crate) fn build_engine(settings: &ValidationSettings) -> Result<Arc<ValidationEngine>, AppError> {
    let engine = ValidationEngine::from_settings(settings)?;
    info!(
        max_deadline_days = settings.max_deadline_days,
        max_text_length = settings.max_text_length,
        custom_denylist = settings.disposable_domains.is_some(),
        "validation engine ready"
    );
    Ok(Arc::new(engine))
}

/// Read one JSON object from `path`, or from stdin when no path is given.
pub(crate) fn read_record(path: Option<&Path>) -> Result<Record, AppError> {
    match path {
        Some(path) => parse_record(BufReader::new(File::open(path)?)),
        None => parse_record(io::stdin().lock()),
    }
}

pub(crate) fn parse_record<R: Read>(reader: R) -> Result<Record, AppError> {
    Ok(serde_json::from_reader(reader)?)
}
