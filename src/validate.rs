//! Client-side input checks run before anything is sent to the database.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Carries the action being attempted, e.g. "adding a player".
    #[error("Please fill in all fields before {0}.")]
    MissingFields(&'static str),

    #[error("Please enter a {0}.")]
    MissingField(&'static str),

    #[error("{0} must be in the format YYYY-MM-DD.")]
    InvalidDate(&'static str),

    #[error("{0} must be a valid integer.")]
    NotAnInteger(&'static str),

    #[error("{0} must be a valid number.")]
    NotANumber(&'static str),

    #[error("{0} must not be negative.")]
    Negative(&'static str),
}

/// True iff `s` is a real calendar date written exactly as `YYYY-MM-DD`.
pub fn is_valid_date(s: &str) -> bool {
    parse_date(s).is_some()
}

/// Strict `YYYY-MM-DD` parse. chrono alone accepts short years and
/// single-digit months, so the shape is checked byte by byte first.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Returns the trimmed value, or `None` when the field is blank.
pub fn non_blank(value: &str) -> Option<&str> {
    let v = value.trim();
    (!v.is_empty()).then_some(v)
}

/// Single-input actions: the trimmed value or a `MissingField` error.
pub fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    non_blank(value)
        .map(str::to_string)
        .ok_or(ValidationError::MissingField(field))
}

pub fn require_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(value.trim()).ok_or(ValidationError::InvalidDate(field))
}

pub fn parse_integer(field: &'static str, value: &str) -> Result<i32, ValidationError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::NotAnInteger(field))
}

/// Integer counter that must be zero or more.
pub fn parse_count(field: &'static str, value: &str) -> Result<i32, ValidationError> {
    let n = parse_integer(field, value)?;
    if n < 0 {
        return Err(ValidationError::Negative(field));
    }
    Ok(n)
}

/// Exact decimal as typed; the scale the user entered is kept.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ValidationError> {
    let v = value.trim();
    Decimal::from_str(v)
        .or_else(|_| Decimal::from_scientific(v))
        .map_err(|_| ValidationError::NotANumber(field))
}
