//! Permissive date parsing for spreadsheet exports.
//!
//! Sheet exports mix layouts within one column (`2024-03-01`,
//! `3/1/2024 14:00:00`, `March 1, 2024`). Each layout is tried in turn and the
//! time of day, when present, is dropped. Slashed dates are month-first, with
//! a day-first retry when the first field cannot be a month. Ordinal suffixes
//! (`5th`) and dotted month abbreviations (`Jan.`) are normalised away first.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static ORDINAL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("valid ordinal suffix regex")
});

static DOTTED_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sept?|oct|nov|dec)\.")
        .expect("valid dotted month regex")
});

static SEPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsept\b").expect("valid sept regex"));

// Two-digit-year layouts come before their four-digit twins: `%Y` would
// happily read "24" as the year 24.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%A, %B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

fn normalize(s: &str) -> String {
    let s = ORDINAL_SUFFIX_RE.replace_all(s, "$1");
    let s = DOTTED_MONTH_RE.replace_all(&s, "$1").into_owned();
    SEPT_RE.replace_all(&s, "Sep").into_owned()
}

/// Parse `raw` into a calendar date, or `None` if no known layout fits.
pub fn parse_mixed_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = normalize(trimmed);
    let s = normalized.as_str();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // 12-hour clock suffixes ("3/1/2024 2:15 PM") only affect the time part.
    let upper = s.to_uppercase();
    if upper.ends_with(" AM") || upper.ends_with(" PM") {
        if let Some((date_part, _)) = s.split_once(' ') {
            return parse_mixed_date(date_part);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_and_slashed_layouts() {
        assert_eq!(parse_mixed_date("2024-03-01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("2024/03/01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("3/1/2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("03/01/24"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("03-01-2024"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn slashed_dates_are_month_first() {
        assert_eq!(parse_mixed_date("4/5/2024"), Some(ymd(2024, 4, 5)));
        assert_eq!(parse_mixed_date("12/11/24"), Some(ymd(2024, 12, 11)));
    }

    #[test]
    fn day_first_when_first_field_cannot_be_a_month() {
        assert_eq!(parse_mixed_date("13/5/2024"), Some(ymd(2024, 5, 13)));
        assert_eq!(parse_mixed_date("31/12/23"), Some(ymd(2023, 12, 31)));
        assert_eq!(parse_mixed_date("25/12/2024 18:00"), Some(ymd(2024, 12, 25)));
        assert_eq!(parse_mixed_date("13/13/2024"), None);
    }

    #[test]
    fn ordinals_and_dotted_abbreviations() {
        assert_eq!(parse_mixed_date("Jan 5th, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_mixed_date("January 5th 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_mixed_date("Jan. 5, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_mixed_date("Sept. 21st, 2024"), Some(ymd(2024, 9, 21)));
        assert_eq!(parse_mixed_date("2nd March 2024"), Some(ymd(2024, 3, 2)));
        assert_eq!(
            parse_mixed_date("Friday, January 5th, 2024"),
            Some(ymd(2024, 1, 5))
        );
    }

    #[test]
    fn dotted_numeric_layouts() {
        assert_eq!(parse_mixed_date("2024.01.05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_mixed_date("05.01.2024"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn textual_months() {
        assert_eq!(parse_mixed_date("March 1, 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("Mar 1 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("1 March 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("1-Mar-2024"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn time_of_day_is_discarded() {
        assert_eq!(parse_mixed_date("2024-03-01 23:59:59"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("2024-03-01T08:30:00"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("2024-03-01T08:30:00+02:00"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("3/1/2024 14:05"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_mixed_date("3/1/2024 2:05 PM"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_mixed_date(""), None);
        assert_eq!(parse_mixed_date("   "), None);
        assert_eq!(parse_mixed_date("ongoing"), None);
        assert_eq!(parse_mixed_date("2024-02-30"), None);
    }
}
