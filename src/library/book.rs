//! Book submission and display models.

use crate::db::{NewBook, StoredBook};
use crate::error::Result;
use crate::library::{
    cover_url, sanitize_notes, validate_date_read_on, validate_isbn, validate_rating,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Raw book fields as submitted by a form or the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookInput {
    /// ISBN text.
    #[serde(default)]
    pub isbn: String,
    /// Rating text.
    #[serde(default)]
    pub rating: String,
    /// Date read, `YYYY-MM-DD`.
    #[serde(default)]
    pub date_read: String,
    /// Free-text notes, unsanitized.
    #[serde(default)]
    pub notes: String,
}

impl BookInput {
    /// Validate every field and sanitize notes.
    ///
    /// Fails on the first invalid field; nothing is written by this call.
    pub fn validate(&self) -> Result<NewBook> {
        self.validate_on(Local::now().date_naive())
    }

    /// Same as [`BookInput::validate`] with an explicit current date.
    pub fn validate_on(&self, today: NaiveDate) -> Result<NewBook> {
        let isbn = validate_isbn(self.isbn.trim())?.to_string();
        let rating = validate_rating(&self.rating)?;
        let date_read = validate_date_read_on(&self.date_read, today)?;

        Ok(NewBook {
            isbn,
            rating,
            date_read,
            notes: sanitize_notes(&self.notes),
        })
    }
}

/// Book as presented on pages and in the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    /// Row ID.
    pub id: i64,
    /// ISBN.
    pub isbn: String,
    /// Numeric rating.
    pub rating: f64,
    /// Rating without a trailing `.0`.
    pub rating_display: String,
    /// "Month Day, Year", or `None` when unknown.
    pub date_read: Option<String>,
    /// `YYYY-MM-DD` for form inputs, empty when unknown.
    pub date_read_value: String,
    /// Notes.
    pub notes: String,
    /// Cover image URL.
    pub cover_url: String,
}

impl From<StoredBook> for BookView {
    fn from(book: StoredBook) -> Self {
        Self {
            rating_display: format_rating(book.rating),
            date_read: book.date_read_display(),
            date_read_value: book.date_read_value(),
            cover_url: cover_url(&book.isbn),
            id: book.id,
            isbn: book.isbn,
            rating: book.rating,
            notes: book.notes,
        }
    }
}

/// Format a rating, dropping the fraction for whole numbers.
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.0}", rating)
    } else {
        let s = format!("{:.2}", rating);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DATE_FORMAT;

    fn today() -> NaiveDate {
        NaiveDate::parse_from_str("2024-06-15", DATE_FORMAT).unwrap()
    }

    fn input(isbn: &str, rating: &str, date: &str, notes: &str) -> BookInput {
        BookInput {
            isbn: isbn.to_string(),
            rating: rating.to_string(),
            date_read: date.to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn validate_builds_sanitized_book() {
        let book = input(" 9780140449136 ", "8", "2023-05-01", "<script>x</script>great")
            .validate_on(today())
            .unwrap();

        assert_eq!(book.isbn, "9780140449136");
        assert_eq!(book.rating, 8.0);
        assert_eq!(book.date_read.format(DATE_FORMAT).to_string(), "2023-05-01");
        assert_eq!(book.notes, "great");
    }

    #[test]
    fn validate_stops_at_first_bad_field() {
        let err = input("abc", "99", "2999-01-01", "")
            .validate_on(today())
            .unwrap_err();
        assert_eq!(err.to_string(), "ISBN must contain only digits");

        let err = input("123", "99", "2999-01-01", "")
            .validate_on(today())
            .unwrap_err();
        assert_eq!(err.to_string(), "Rating must be between 0 and 10");

        let err = input("123", "9", "2999-01-01", "")
            .validate_on(today())
            .unwrap_err();
        assert_eq!(err.to_string(), "Date read cannot be in the future");
    }

    #[test]
    fn view_formats_stored_book() {
        let view = BookView::from(StoredBook {
            id: 3,
            isbn: "9780140449136".to_string(),
            rating: 8.0,
            date_read: Some(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()),
            notes: "great".to_string(),
        });

        assert_eq!(view.rating_display, "8");
        assert_eq!(view.date_read.as_deref(), Some("May 1, 2023"));
        assert_eq!(view.date_read_value, "2023-05-01");
        assert_eq!(
            view.cover_url,
            "https://covers.openlibrary.org/b/isbn/9780140449136-L.jpg?default=false"
        );
    }

    #[test]
    fn rating_display() {
        assert_eq!(format_rating(10.0), "10");
        assert_eq!(format_rating(0.0), "0");
        assert_eq!(format_rating(7.5), "7.5");
        assert_eq!(format_rating(6.25), "6.25");
        assert_eq!(format_rating(7.001), "7");
    }
}
