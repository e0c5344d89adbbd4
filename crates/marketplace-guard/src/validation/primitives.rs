//! Atomic field checks. Each returns `Ok(())` or the single error it found; callers
//! decide whether to keep going.

use std::borrow::Cow;

use regex::Regex;
use serde_json::{json, Value};

use super::domain::{ErrorKind, ValidationError};

pub type Check = Result<(), ValidationError>;

/// Read a value as text. Numbers and booleans use their display form; arrays and
/// objects cannot be coerced.
pub fn coerce_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text.as_str())),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Bool(flag) => Some(Cow::Owned(flag.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read a value as a finite number, accepting numeric strings.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    number.is_finite().then_some(number)
}

pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

pub fn required(value: Option<&Value>, field: &str) -> Check {
    if is_blank(value) {
        return Err(ValidationError::new(
            ErrorKind::Required,
            field,
            format!("{field} is required"),
        ));
    }
    Ok(())
}

pub fn length(value: &Value, min: Option<usize>, max: Option<usize>, field: &str) -> Check {
    let text = coerce_text(value).ok_or_else(|| not_text(field))?;
    let count = text.chars().count();

    let too_short = min.is_some_and(|min| count < min);
    let too_long = max.is_some_and(|max| count > max);
    if !too_short && !too_long {
        return Ok(());
    }

    let message = match (min, max) {
        (Some(min), Some(max)) => format!("{field} must be between {min} and {max} characters"),
        (Some(min), None) => format!("{field} must be at least {min} characters"),
        (None, Some(max)) => format!("{field} must be at most {max} characters"),
        (None, None) => format!("{field} has an invalid length"),
    };

    Err(ValidationError::new(ErrorKind::Length, field, message)
        .with_actual(count)
        .with_expected(json!({ "min": min, "max": max })))
}

pub fn range(value: &Value, min: Option<f64>, max: Option<f64>, field: &str) -> Check {
    let number = coerce_number(value).ok_or_else(|| {
        ValidationError::new(ErrorKind::Format, field, format!("{field} must be a number"))
            .with_actual(value.clone())
    })?;

    let below = min.is_some_and(|min| number < min);
    let above = max.is_some_and(|max| number > max);
    if !below && !above {
        return Ok(());
    }

    let message = match (min, max) {
        (Some(min), Some(max)) => format!("{field} must be between {min} and {max}"),
        (Some(min), None) => format!("{field} must be at least {min}"),
        (None, Some(max)) => format!("{field} must be at most {max}"),
        (None, None) => format!("{field} is out of range"),
    };

    Err(ValidationError::new(ErrorKind::Range, field, message)
        .with_actual(number)
        .with_expected(json!({ "min": min, "max": max })))
}

pub fn pattern(value: &Value, regex: &Regex, field: &str, message: Option<&str>) -> Check {
    let text = coerce_text(value).ok_or_else(|| not_text(field))?;
    if regex.is_match(&text) {
        return Ok(());
    }

    let message = message
        .map(str::to_string)
        .unwrap_or_else(|| format!("{field} has an invalid format"));
    Err(ValidationError::new(ErrorKind::Format, field, message).with_actual(text.into_owned()))
}

pub fn one_of(value: &Value, allowed: &[String], field: &str) -> Check {
    let text = coerce_text(value).ok_or_else(|| not_text(field))?;
    if allowed.iter().any(|option| option == text.as_ref()) {
        return Ok(());
    }

    Err(ValidationError::new(
        ErrorKind::Format,
        field,
        format!("{field} must be one of: {}", allowed.join(", ")),
    )
    .with_actual(text.into_owned())
    .with_expected(allowed.to_vec()))
}

pub(crate) fn not_text(field: &str) -> ValidationError {
    ValidationError::new(
        ErrorKind::Format,
        field,
        format!("{field} cannot be read as text"),
    )
}
