//! Calendar-date display formatting. Dates are treated as calendar dates
//! throughout the site, never as instants, so there is no timezone handling
//! here; a post written on April 16th stays April 16th everywhere.

use chrono::{Datelike, NaiveDate};

/// A named display format for dates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Style {
    /// `April 16th, 2021`. Used on item pages.
    Full,

    /// `Apr 16th, 2021`. Used on compact listing cards.
    Abbreviated,

    /// `2021-04-16`.
    Iso,
}

/// Renders `date` in the given [`Style`]. Deterministic for a given date
/// and style.
pub fn format(date: NaiveDate, style: Style) -> String {
    match style {
        Style::Full => {
            format!(
                "{} {}, {}",
                date.format("%B"),
                ordinal(date.day()),
                date.year()
            )
        }
        Style::Abbreviated => {
            format!(
                "{} {}, {}",
                date.format("%b"),
                ordinal(date.day()),
                date.year()
            )
        }
        Style::Iso => date.format("%Y-%m-%d").to_string(),
    }
}

// English ordinal day-of-month. The teens are all "th", including 11-13.
fn ordinal(day: u32) -> String {
    let suffix = match day {
        11 | 12 | 13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{}{}", day, suffix)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_full_style() {
        assert_eq!(
            format(NaiveDate::from_ymd(2021, 4, 16), Style::Full),
            "April 16th, 2021"
        );
    }

    #[test]
    fn test_abbreviated_style() {
        assert_eq!(
            format(NaiveDate::from_ymd(2021, 4, 16), Style::Abbreviated),
            "Apr 16th, 2021"
        );
    }

    #[test]
    fn test_iso_style() {
        assert_eq!(
            format(NaiveDate::from_ymd(2021, 4, 16), Style::Iso),
            "2021-04-16"
        );
    }

    #[test]
    fn test_ordinal_suffixes() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (23, "23rd"),
            (31, "31st"),
        ];
        for (day, wanted) in &cases {
            assert_eq!(&ordinal(*day), wanted);
        }
    }
}
