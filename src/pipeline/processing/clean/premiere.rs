use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use super::classify::{FieldError, Vocabulary};
use super::text::strip_trailing_note;
use crate::constants::UNPARSED_DATE;

/// Premiere placeholders that are not calendar dates
const NON_DATES: Vocabulary = Vocabulary::exact(
    "Premiere",
    &[
        "nan",
        "TBA",
        "2022",
        "2023",
        "2024",
        "Summer 2022",
        "Mid 2022",
        "Late 2022",
    ],
);

const DASHED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d"];
const LONG_FORMAT: &str = "%B %d, %Y";
const OUTPUT_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Premiere {
    Date(NaiveDate),
    /// Rendered as "nan"
    Unparsed,
}

impl fmt::Display for Premiere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Premiere::Date(date) => write!(f, "{}", date.format(OUTPUT_FORMAT)),
            Premiere::Unparsed => f.write_str(UNPARSED_DATE),
        }
    }
}

impl Serialize for Premiere {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn clean_premiere(raw: Option<&str>) -> Result<Premiere, FieldError> {
    let text = raw
        .map(strip_trailing_note)
        .unwrap_or_else(|| UNPARSED_DATE.to_string());
    NON_DATES.classify_or_fail(&text, Premiere::Unparsed, parse_date)
}

fn parse_date(text: &str) -> Option<Premiere> {
    let date = if text.contains('-') {
        DASHED_FORMATS.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(text, format)
                .map(|dt| dt.date())
                .or_else(|_| NaiveDate::parse_from_str(text, format))
                .ok()
        })
    } else {
        NaiveDate::parse_from_str(text, LONG_FORMAT).ok()
    };
    date.map(Premiere::Date)
}
