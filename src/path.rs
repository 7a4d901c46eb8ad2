//! Date Path Model
//!
//! Maps a calendar date onto the four collection names that make up its
//! place in the hierarchy: root label, year, year-month, full date.

use crate::error::ApiError;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Root collection name used when none is configured
pub const DEFAULT_ROOT_LABEL: &str = "Daily Folder";

/// Segment names for one date, ordered from the root down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePath {
    pub root: String,
    pub year: String,
    pub month: String,
    pub day: String,
}

impl DatePath {
    /// Segments in top-down order.
    pub fn segments(&self) -> [&str; 4] {
        [&self.root, &self.year, &self.month, &self.day]
    }
}

/// Derive the segment names for `date` anchored under `root_label`.
pub fn derive_path(date: NaiveDate, root_label: &str) -> DatePath {
    let year = format!("{:04}", date.year());
    let month = format!("{}-{:02}", year, date.month());
    let day = format!("{}-{:02}", month, date.day());
    DatePath {
        root: root_label.to_string(),
        year,
        month,
        day,
    }
}

/// Format a date the way leaf collections are named.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// True when `name` has the `\d{4}-\d{2}-\d{2}` shape of a date leaf.
///
/// Shape only; `2025-13-40` passes. Callers that need a real day use
/// [`parse_date`].
pub fn is_date_leaf_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Parse a strict `YYYY-MM-DD` string into a calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ApiError> {
    if !is_date_leaf_name(input) {
        return Err(ApiError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidDate(input.to_string()))
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
