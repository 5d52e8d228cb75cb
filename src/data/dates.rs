//! Date parsing for historical records and user input
//!
//! The corpus stores ISO dates (`YYYY-MM-DD`); the prediction form takes
//! `DD/MM/YYYY`. Both are reduced to [`DateParts`] before feature encoding.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Date format used by the historical corpus
pub const CORPUS_DATE_FORMAT: &str = "%Y-%m-%d";
/// Date format accepted from users
pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";
/// Exact length of a user date string
const INPUT_DATE_LEN: usize = 10;

/// Calendar components derived from a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<NaiveDate> for DateParts {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

fn input_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap())
}

/// Parse a corpus date (`YYYY-MM-DD`)
pub fn parse_corpus_date(value: &str) -> Option<DateParts> {
    NaiveDate::parse_from_str(value.trim(), CORPUS_DATE_FORMAT)
        .ok()
        .map(DateParts::from)
}

/// Parse a user date (`DD/MM/YYYY`, exactly 10 characters)
///
/// Returns `None` for anything that is not a real calendar date in that
/// exact layout, e.g. `"32/13/2023"` or `"1/1/2023"`.
pub fn parse_input_date(value: &str) -> Option<DateParts> {
    if value.len() != INPUT_DATE_LEN || !input_pattern().is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, INPUT_DATE_FORMAT)
        .ok()
        .map(DateParts::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_date_valid() {
        let parts = parse_input_date("25/07/2023").unwrap();
        assert_eq!(
            parts,
            DateParts {
                year: 2023,
                month: 7,
                day: 25
            }
        );
    }

    #[test]
    fn test_parse_input_date_leap_day() {
        assert!(parse_input_date("29/02/2024").is_some());
        assert!(parse_input_date("29/02/2023").is_none());
    }

    #[test]
    fn test_parse_input_date_invalid_calendar() {
        assert!(parse_input_date("32/13/2023").is_none());
        assert!(parse_input_date("31/04/2023").is_none());
        assert!(parse_input_date("00/01/2023").is_none());
    }

    #[test]
    fn test_parse_input_date_wrong_layout() {
        assert!(parse_input_date("").is_none());
        assert!(parse_input_date("1/7/2023").is_none());
        assert!(parse_input_date("2023-07-25").is_none());
        assert!(parse_input_date("25-07-2023").is_none());
        assert!(parse_input_date("25/07/20233").is_none());
        assert!(parse_input_date(" 25/07/2023").is_none());
    }

    #[test]
    fn test_parse_corpus_date() {
        let parts = parse_corpus_date("2021-03-28").unwrap();
        assert_eq!(parts.year, 2021);
        assert_eq!(parts.month, 3);
        assert_eq!(parts.day, 28);
        assert!(parse_corpus_date("28/03/2021").is_none());
        assert!(parse_corpus_date("").is_none());
    }
}
