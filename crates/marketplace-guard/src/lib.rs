//! Validation and sanitization for marketplace form submissions.
//!
//! The [`validation`] module holds the engine; [`config`], [`error`] and [`telemetry`]
//! carry the process-level plumbing shared with the API service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod validation;

pub use validation::{
    EntityKind, ErrorKind, Record, ValidationEngine, ValidationError, ValidationResult,
};
