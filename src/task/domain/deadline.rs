//! Activity deadline parsing.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Date-time layouts tried in order. The first successful layout wins.
const DATE_TIME_FORMATS: [&str; 5] = [
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M",
];

/// Date-only layouts, tried after every date-time layout failed.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// `%Y` accepts one to four digits; spreadsheets must spell the year out.
const FOUR_DIGIT_YEARS: RangeInclusive<i32> = 1000..=9999;

fn has_four_digit_year(date: &impl Datelike) -> bool {
    FOUR_DIGIT_YEARS.contains(&date.year())
}

/// Deadline of an activity, with or without a time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Deadline {
    /// Calendar day without a time component.
    Date(NaiveDate),
    /// Calendar day and wall-clock time.
    DateTime(NaiveDateTime),
}

impl Deadline {
    /// Parses a spreadsheet date such as `15/03/2024` or `15/03/2024 14:30`.
    ///
    /// Returns `None` when no supported layout accepts the trimmed value,
    /// including calendar-invalid dates like `31/02/2024` and two-digit
    /// years like `15/03/24`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        DATE_TIME_FORMATS
            .iter()
            .find_map(|format| {
                NaiveDateTime::parse_from_str(trimmed, format)
                    .ok()
                    .filter(has_four_digit_year)
            })
            .map(Self::DateTime)
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|format| {
                        NaiveDate::parse_from_str(trimmed, format)
                            .ok()
                            .filter(has_four_digit_year)
                    })
                    .map(Self::Date)
            })
    }

    /// Returns the calendar day of the deadline.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        match self {
            Self::Date(date) => date,
            Self::DateTime(date_time) => date_time.date(),
        }
    }

    /// Returns the deadline as a date-time, using midnight for date-only
    /// values.
    #[must_use]
    pub const fn to_date_time(self) -> NaiveDateTime {
        match self {
            Self::Date(date) => date.and_time(chrono::NaiveTime::MIN),
            Self::DateTime(date_time) => date_time,
        }
    }

    /// Returns `true` when the deadline carries a time of day.
    #[must_use]
    pub const fn has_time(self) -> bool {
        matches!(self, Self::DateTime(_))
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%d/%m/%Y")),
            Self::DateTime(date_time) => write!(f, "{}", date_time.format("%d/%m/%Y %H:%M")),
        }
    }
}
