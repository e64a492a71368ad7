//! CSV-side interpretation of the card transaction export.
//!
//! The export has a fixed column layout: two leading header rows, one
//! transaction per row, and a trailing `Total` footer row. This module
//! turns one raw row into a [`Transaction`], applying the skip and
//! validation rules.

use crate::error::{Error, Result};
use crate::types::{Direction, SwiftDate, Transaction};
use crate::ConvertOptions;

/// Account identification.
pub const COL_ACCOUNT: usize = 1;
/// Value date (`DD.MM.YYYY`).
pub const COL_VALUE_DATE: usize = 3;
/// Free-text narrative.
pub const COL_COMMENT: usize = 4;
/// Comma-separated labels.
pub const COL_TAGS: usize = 5;
/// Currency code, may be blank.
pub const COL_CURRENCY: usize = 7;
/// Amount when the transaction is a debit.
pub const COL_AMOUNT_DEBIT: usize = 10;
/// Amount when the transaction is a credit.
pub const COL_AMOUNT_CREDIT: usize = 11;
/// Booking date (`DD.MM.YYYY`).
pub const COL_BOOKING_DATE: usize = 12;

/// A data row must reach the booking date column.
const MIN_COLUMNS: usize = COL_BOOKING_DATE + 1;

/// Number of leading header rows in the export.
const HEADER_ROWS: usize = 2;

/// Start of the footer row text, after four leading delimiters.
const FOOTER_MARKER: &str = "Total";

/// Interpret one raw CSV row.
///
/// Returns `Ok(None)` for rows the conversion skips: the two header rows,
/// fully blank rows, and the `Total` footer. `row_number` is the 1-based
/// file line the row starts on, header lines included; it is carried into
/// every error so bad source data can be located.
///
/// # Examples
///
/// ```
/// use csv2mt940::csv_format::parse_row;
/// use csv2mt940::{ConvertOptions, Direction};
///
/// let fields: Vec<String> = ";12345;;24.05.2024;Payment ABC;food,rent;;CHF;;;100.00;;24.05.2024"
///     .split(';')
///     .map(String::from)
///     .collect();
///
/// let options = ConvertOptions::default();
/// let tx = parse_row(&fields, 3, &options)?.expect("a data row");
/// assert_eq!(tx.direction, Direction::Debit);
/// assert_eq!(tx.amount, "100,00");
/// # Ok::<(), csv2mt940::Error>(())
/// ```
pub fn parse_row(
    fields: &[String],
    row_number: usize,
    options: &ConvertOptions,
) -> Result<Option<Transaction>> {
    if row_number <= HEADER_ROWS {
        return Ok(None);
    }
    if fields.iter().all(|field| field.trim().is_empty()) {
        return Ok(None);
    }

    let delimiter = (options.delimiter as char).to_string();
    let joined = fields.join(&delimiter).trim().to_string();
    let footer = format!("{}{}", delimiter.repeat(4), FOOTER_MARKER);
    if joined.starts_with(&footer) {
        return Ok(None);
    }

    if fields.len() < MIN_COLUMNS {
        return Err(Error::MalformedRow {
            row: row_number,
            columns: fields.len(),
            required: MIN_COLUMNS,
            raw: joined,
        });
    }

    let account = fields[COL_ACCOUNT].trim().to_string();
    let comment = fields[COL_COMMENT].trim().to_string();
    let tags = split_tags(&fields[COL_TAGS]);
    let currency = match fields[COL_CURRENCY].trim() {
        "" => options.fallback_currency.clone(),
        code => code.to_string(),
    };

    let booking_date = parse_date(&fields[COL_BOOKING_DATE], row_number)?;
    let value_date = parse_date(&fields[COL_VALUE_DATE], row_number)?;

    let (amount, direction) = resolve_amount(&fields[COL_AMOUNT_DEBIT], &fields[COL_AMOUNT_CREDIT])
        .ok_or_else(|| Error::MissingAmount {
            row: row_number,
            raw: joined,
        })?;

    Ok(Some(Transaction {
        booking_date,
        value_date,
        account,
        currency,
        amount,
        direction,
        comment,
        tags,
    }))
}

fn parse_date(raw: &str, row_number: usize) -> Result<SwiftDate> {
    let raw = raw.trim();
    SwiftDate::parse_dmy(raw).ok_or_else(|| Error::InvalidDateFormat {
        row: row_number,
        value: raw.to_string(),
    })
}

/// Pick the populated amount column and the matching direction.
///
/// The export writes debits to one column and credits to the other. The
/// value keeps its original text apart from swapping every `.` for the
/// comma decimal separator SWIFT expects; it is never parsed numerically.
fn resolve_amount(debit: &str, credit: &str) -> Option<(String, Direction)> {
    let debit = debit.trim();
    let credit = credit.trim();

    if !debit.is_empty() {
        Some((debit.replace('.', ","), Direction::Debit))
    } else if !credit.is_empty() {
        Some((credit.replace('.', ","), Direction::Credit))
    } else {
        None
    }
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}
