//! Common types shared by the CSV and MT940 sides of the conversion.

use serde::{Deserialize, Serialize};

/// A calendar date reduced to the two-digit components SWIFT tags use.
///
/// The source export writes dates as `DD.MM.YYYY`; the century is discarded
/// on parse and never recovered. Only the shape of the input is checked (dot
/// positions and length), not the digits: the legacy converter this
/// reimplements accepted any text in the digit positions, and statements
/// produced from it must stay byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwiftDate {
    /// Last two digits of the year.
    pub year: String,

    /// Two-digit month.
    pub month: String,

    /// Two-digit day.
    pub day: String,
}

impl SwiftDate {
    /// Parse a `DD.MM.YYYY`-style string.
    ///
    /// The input must be at least 10 characters long with `.` at character
    /// positions 2 and 5. Anything after the tenth character is ignored.
    /// Returns `None` for any other shape; the caller attaches the row
    /// context to the error.
    pub fn parse_dmy(raw: &str) -> Option<Self> {
        let chars: Vec<char> = raw.chars().collect();
        if chars.len() < 10 || chars[2] != '.' || chars[5] != '.' {
            return None;
        }
        Some(SwiftDate {
            year: chars[8..10].iter().collect(),
            month: chars[3..5].iter().collect(),
            day: chars[0..2].iter().collect(),
        })
    }

    /// Render as `YYMMDD`, the form used in `:61:` statement lines.
    pub fn yymmdd(&self) -> String {
        format!("{}{}{}", self.year, self.month, self.day)
    }

    /// Render as `MMDD`, the booking-date part of a `:61:` line.
    pub fn mmdd(&self) -> String {
        format!("{}{}", self.month, self.day)
    }

    /// Render as `DDMMYY`.
    ///
    /// The balance tags `:60F:`/`:62F:` carry their date day-first, unlike
    /// the year-first `:61:` line. This mirrors the legacy output.
    pub fn ddmmyy(&self) -> String {
        format!("{}{}{}", self.day, self.month, self.year)
    }
}

/// Debit/Credit indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Debit transaction (outgoing).
    Debit,
    /// Credit transaction (incoming).
    Credit,
}

impl Direction {
    /// One-letter code written into `:61:` lines.
    pub fn code(&self) -> &'static str {
        match self {
            Direction::Debit => "D",
            Direction::Credit => "C",
        }
    }
}

/// One card transaction derived from a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Booking date (`MMDD` part of the `:61:` line).
    pub booking_date: SwiftDate,

    /// Value date (leads the `:61:` line, tracked for the balance tags).
    pub value_date: SwiftDate,

    /// Account identification, free text.
    pub account: String,

    /// Currency code; the configured fallback when the column was blank.
    pub currency: String,

    /// Amount text with comma decimal separator, no sign.
    ///
    /// Carried verbatim from the export apart from the separator swap; the
    /// converter never interprets it numerically.
    pub amount: String,

    /// Debit or credit, decided by which amount column was populated.
    pub direction: Direction,

    /// Free-text narrative source for the `:86:` block.
    pub comment: String,

    /// Labels from the tags column, trimmed, empties dropped.
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dmy() {
        let date = SwiftDate::parse_dmy("31.12.2024").unwrap();
        assert_eq!(date.day, "31");
        assert_eq!(date.month, "12");
        assert_eq!(date.year, "24");
    }

    #[test]
    fn test_parse_dmy_ignores_trailing_text() {
        let date = SwiftDate::parse_dmy("05.01.2024 10:30").unwrap();
        assert_eq!(date.yymmdd(), "240105");
    }

    #[test]
    fn test_parse_dmy_shape_only() {
        // Dot positions decide acceptance; digits are not validated.
        let date = SwiftDate::parse_dmy("AB.CD.EFGH").unwrap();
        assert_eq!(date.day, "AB");
        assert_eq!(date.month, "CD");
        assert_eq!(date.year, "GH");
    }

    #[test]
    fn test_parse_dmy_rejects_other_shapes() {
        assert!(SwiftDate::parse_dmy("31-12-2024").is_none());
        assert!(SwiftDate::parse_dmy("2024.12.31").is_none());
        assert!(SwiftDate::parse_dmy("1.2.2024").is_none());
        assert!(SwiftDate::parse_dmy("31.12.24").is_none());
        assert!(SwiftDate::parse_dmy("").is_none());
    }

    #[test]
    fn test_renderers() {
        let date = SwiftDate::parse_dmy("24.05.2024").unwrap();
        assert_eq!(date.yymmdd(), "240524");
        assert_eq!(date.mmdd(), "0524");
        assert_eq!(date.ddmmyy(), "240524");

        let date = SwiftDate::parse_dmy("31.12.2024").unwrap();
        assert_eq!(date.yymmdd(), "241231");
        assert_eq!(date.ddmmyy(), "311224");
    }

    #[test]
    fn test_direction_code() {
        assert_eq!(Direction::Debit.code(), "D");
        assert_eq!(Direction::Credit.code(), "C");
    }
}
