//! The conversion run: CSV rows in, one MT940 statement out.
//!
//! Wires a CSV reader to the row pipeline and the statement accumulator.
//! The whole input is consumed before anything can be written; the
//! statement serializes its bodies newest-first, so streaming out while
//! reading is not possible.

use crate::csv_format::parse_row;
use crate::error::Result;
use crate::mt940_format::Mt940Statement;
use crate::ConvertOptions;
use csv::ReaderBuilder;
use std::io::Read;

/// Convert a whole CSV export read from `reader` into an [`Mt940Statement`].
///
/// Rows are consumed to completion, or until the configured transaction
/// limit is reached. Any row-level failure aborts the run; no statement
/// is produced.
///
/// # Examples
///
/// ```
/// use csv2mt940::{conversion, ConvertOptions};
///
/// let csv = "Card statement;;\r\nAccount;Created;\r\n;12345;;24.05.2024;Coffee;;;CHF;;;12.30;;23.05.2024\r\n";
/// let options = ConvertOptions::default();
///
/// let statement = conversion::csv_to_mt940(&mut csv.as_bytes(), &options)?;
/// assert_eq!(statement.transaction_count(), 1);
/// # Ok::<(), csv2mt940::Error>(())
/// ```
pub fn csv_to_mt940<R: Read>(reader: &mut R, options: &ConvertOptions) -> Result<Mt940Statement> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut statement = Mt940Statement::new(options);

    for result in csv_reader.records() {
        let record = result?;
        // The reader drops fully empty lines, so the file line of each
        // record comes from its position tracking, not a record counter.
        // Errors must point at the line as it appears in the file.
        let row_number = record.position().map_or(0, |p| p.line() as usize);
        let fields: Vec<String> = record.iter().map(String::from).collect();

        if let Some(tx) = parse_row(&fields, row_number, options)? {
            statement.push(&tx, options);

            if let Some(limit) = options.limit {
                if statement.transaction_count() >= limit {
                    break;
                }
            }
        }
    }

    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "Card statement;;\r\nAccount;Created;\r\n";

    fn data_row(value: &str, comment: &str, debit: &str, credit: &str, booking: &str) -> String {
        format!(
            ";12345;;{};{};;;CHF;;;{};{};{}\r\n",
            value, comment, debit, credit, booking
        )
    }

    fn convert(csv: &str, options: &ConvertOptions) -> Result<Mt940Statement> {
        csv_to_mt940(&mut csv.as_bytes(), options)
    }

    fn output(statement: &Mt940Statement) -> String {
        let mut out = Vec::new();
        statement.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_three_row_csv_single_transaction() {
        let csv = format!(
            "{}{}",
            HEADER,
            data_row("24.05.2024", "Coffee", "12.30", "", "23.05.2024")
        );
        let options = ConvertOptions::default();
        let statement = convert(&csv, &options).unwrap();

        assert_eq!(statement.transaction_count(), 1);
        assert_eq!(output(&statement).matches(":61:").count(), 1);
    }

    #[test]
    fn test_bodies_written_in_reverse_order() {
        let csv = format!(
            "{}{}{}",
            HEADER,
            data_row("05.01.2024", "First", "10.00", "", "04.01.2024"),
            data_row("06.01.2024", "Second", "20.00", "", "05.01.2024")
        );
        let options = ConvertOptions::default();
        let text = output(&convert(&csv, &options).unwrap());

        let second = text.find(":61:240106").expect("second transaction");
        let first = text.find(":61:240105").expect("first transaction");
        assert!(second < first);
    }

    #[test]
    fn test_limit_stops_conversion() {
        let csv = format!(
            "{}{}{}{}",
            HEADER,
            data_row("05.01.2024", "First", "10.00", "", "04.01.2024"),
            data_row("06.01.2024", "Second", "20.00", "", "05.01.2024"),
            data_row("07.01.2024", "Third", "30.00", "", "06.01.2024")
        );
        let options = ConvertOptions {
            limit: Some(2),
            ..ConvertOptions::default()
        };
        let statement = convert(&csv, &options).unwrap();

        assert_eq!(statement.transaction_count(), 2);
        let text = output(&statement);
        assert!(text.contains("Second"));
        assert!(!text.contains("Third"));
        // The opening balance date stays at the last accepted row.
        assert!(text.contains(":60F:C060124CHF0,0"));
    }

    #[test]
    fn test_skips_blank_and_footer_rows() {
        let csv = format!(
            "{}{};;;;;;;;;;;;\r\n;;;;Total;;;;;;30.00;;\r\n",
            HEADER,
            data_row("05.01.2024", "Only", "10.00", "", "04.01.2024")
        );
        let options = ConvertOptions::default();
        let statement = convert(&csv, &options).unwrap();

        assert_eq!(statement.transaction_count(), 1);
        let text = output(&statement);
        // Skipped rows do not move the balance dates.
        assert!(text.contains(":60F:C050124CHF0,0"));
        assert!(text.contains(":62F:C050124CHF0,0"));
    }

    #[test]
    fn test_row_numbers_count_empty_lines() {
        // An empty file line yields no CSV record, but errors past it
        // must still carry the real file line.
        let csv = format!(
            "{}\r\n{}",
            HEADER,
            data_row("2024-05-24", "Coffee", "12.30", "", "23.05.2024")
        );
        let options = ConvertOptions::default();
        let err = convert(&csv, &options).unwrap_err();

        match err {
            Error::InvalidDateFormat { row, value } => {
                assert_eq!(row, 4);
                assert_eq!(value, "2024-05-24");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_leading_empty_line_shifts_header_window() {
        // With an empty first line the second header line lands on file
        // line 3 and is read as data, exactly like the legacy converter.
        let csv = format!("\r\n{}", HEADER);
        let options = ConvertOptions::default();
        let err = convert(&csv, &options).unwrap_err();

        match err {
            Error::MalformedRow { row, columns, .. } => {
                assert_eq!(row, 3);
                assert_eq!(columns, 3);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_date_aborts_run() {
        let csv = format!(
            "{}{}",
            HEADER,
            data_row("2024-05-24", "Coffee", "12.30", "", "23.05.2024")
        );
        let options = ConvertOptions::default();
        let err = convert(&csv, &options).unwrap_err();

        match err {
            Error::InvalidDateFormat { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "2024-05-24");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_amount_aborts_run() {
        let csv = format!(
            "{}{}",
            HEADER,
            data_row("24.05.2024", "Coffee", "", "", "23.05.2024")
        );
        let options = ConvertOptions::default();
        let err = convert(&csv, &options).unwrap_err();

        match err {
            Error::MissingAmount { row, .. } => assert_eq!(row, 3),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_short_row_aborts_run() {
        let csv = format!("{}too;few;columns\r\n", HEADER);
        let options = ConvertOptions::default();
        let err = convert(&csv, &options).unwrap_err();

        match err {
            Error::MalformedRow { row, columns, required, .. } => {
                assert_eq!(row, 3);
                assert_eq!(columns, 3);
                assert_eq!(required, 13);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_custom_delimiter() {
        let csv = "Card statement,,\r\nAccount,Created,\r\n,12345,,24.05.2024,Coffee,,,CHF,,,12.30,,23.05.2024\r\n";
        let options = ConvertOptions {
            delimiter: b',',
            ..ConvertOptions::default()
        };
        let statement = convert(csv, &options).unwrap();
        assert_eq!(statement.transaction_count(), 1);
    }

    #[test]
    fn test_empty_input() {
        let options = ConvertOptions::default();

        let statement = convert("", &options).unwrap();
        assert_eq!(statement.transaction_count(), 0);
        assert_eq!(output(&statement), "\u{feff}\r\n");

        // Header rows alone yield the same empty statement.
        let statement = convert(HEADER, &options).unwrap();
        assert_eq!(statement.transaction_count(), 0);
        assert_eq!(output(&statement), "\u{feff}\r\n");
    }
}
