//! Input validators for book submissions.
//!
//! Each validator is pure and returns [`AppError::Validation`] with a
//! message fit to show the user.

use crate::db::DATE_FORMAT;
use crate::error::{AppError, Result};
use chrono::{Local, NaiveDate};

/// Longest accepted ISBN (ISBN-13).
const MAX_ISBN_LEN: usize = 13;

const MIN_RATING: f64 = 0.0;
const MAX_RATING: f64 = 10.0;

/// Validate an ISBN: 1 to 13 ASCII digits.
pub fn validate_isbn(isbn: &str) -> Result<&str> {
    if isbn.is_empty() || !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(
            "ISBN must contain only digits".to_string(),
        ));
    }

    if isbn.len() > MAX_ISBN_LEN {
        return Err(AppError::Validation(format!(
            "ISBN must be at most {} digits",
            MAX_ISBN_LEN
        )));
    }

    Ok(isbn)
}

/// Parse and validate a rating in `[0, 10]`.
pub fn validate_rating(rating: &str) -> Result<f64> {
    let value: f64 = rating
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Rating '{}' is not a number", rating)))?;

    // NaN fails both comparisons, infinities fail the range.
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(AppError::Validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }

    Ok(value)
}

/// Parse and validate a read date against today's local date.
pub fn validate_date_read(date: &str) -> Result<NaiveDate> {
    validate_date_read_on(date, Local::now().date_naive())
}

/// Parse and validate a read date that must not be after `today`.
pub fn validate_date_read_on(date: &str, today: NaiveDate) -> Result<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| {
        AppError::Validation(format!("Date '{}' is not a valid YYYY-MM-DD date", date))
    })?;

    if parsed > today {
        return Err(AppError::Validation(
            "Date read cannot be in the future".to_string(),
        ));
    }

    Ok(parsed)
}

/// Parse a record ID from form input.
pub fn validate_id(id: &str) -> Result<i64> {
    match id.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(AppError::Validation(format!("Invalid book id '{}'", id))),
    }
}
