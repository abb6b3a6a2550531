mod schema;

pub use schema::{Database, UpdateOutcome};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage format for `date_read`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ordering applied to book listings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently added first.
    #[default]
    #[serde(alias = "recent")]
    Id,
    /// Highest rating first.
    Best,
    /// Most recently read first.
    Newest,
    /// Earliest read first.
    Oldest,
}

impl SortOrder {
    /// ORDER BY clause for this ordering.
    ///
    /// Rows without a read date go last for both date orders.
    pub fn order_by(&self) -> &'static str {
        match self {
            SortOrder::Id => "id DESC",
            SortOrder::Best => "rating DESC, id DESC",
            SortOrder::Newest => "date_read IS NULL, date_read DESC, id DESC",
            SortOrder::Oldest => "date_read IS NULL, date_read ASC, id DESC",
        }
    }

    /// Human-readable heading for list pages.
    pub fn heading(&self) -> &'static str {
        match self {
            SortOrder::Id => "Recently added",
            SortOrder::Best => "Best rated",
            SortOrder::Newest => "Newest reads",
            SortOrder::Oldest => "Oldest reads",
        }
    }
}

/// Book row as stored in the `book` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBook {
    /// Generated row ID.
    pub id: i64,
    /// ISBN, digits only.
    pub isbn: String,
    /// Rating between 0 and 10.
    pub rating: f64,
    /// Date the book was read. `None` when missing or unreadable.
    pub date_read: Option<NaiveDate>,
    /// Sanitized notes.
    pub notes: String,
}

impl StoredBook {
    /// `date_read` formatted for display ("May 1, 2023").
    pub fn date_read_display(&self) -> Option<String> {
        self.date_read.map(format_display_date)
    }

    /// `date_read` in storage format, for pre-filling date inputs.
    pub fn date_read_value(&self) -> String {
        self.date_read
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Validated book fields ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    /// ISBN, digits only.
    pub isbn: String,
    /// Rating between 0 and 10.
    pub rating: f64,
    /// Date the book was read.
    pub date_read: NaiveDate,
    /// Sanitized notes.
    pub notes: String,
}

/// Format a date as "Month Day, Year".
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Parse a stored date, treating anything unreadable as absent.
pub fn parse_stored_date(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
}
