//! csv2mt940 - CLI tool for converting card CSV exports into MT940 statements.

use clap::Parser;
use csv2mt940::csv_format::{self, parse_row};
use csv2mt940::{conversion, ConvertOptions, Error, Profile, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;

#[derive(Parser)]
#[command(name = "csv2mt940")]
#[command(about = "Convert ';'-CSV to MT940 .sta (StarMoney-friendly with -p starmoney)", long_about = None)]
struct Cli {
    /// Path to input CSV
    input_csv: String,

    /// Path to output MT940 (.sta)
    output_sta: String,

    /// CSV encoding (iso-8859-1 or utf-8)
    #[arg(long, default_value = "iso-8859-1")]
    encoding: String,

    /// CSV delimiter
    #[arg(long, default_value = ";", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Process first N transactions only (0=all)
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Verbose table output (cannot be combined with --profile)
    #[arg(short, long, conflicts_with = "profile")]
    debug: bool,

    /// Output profile tweaks (starmoney, plain)
    #[arg(short, long)]
    profile: Option<String>,

    /// MT940 :61: transaction code
    #[arg(long, default_value = "NTRF")]
    ttype: String,

    /// EREF+ value for :86:
    #[arg(long, default_value = "NONREF")]
    eref: String,

    /// PURP+ (optional SEPA purpose code) for :86:
    #[arg(long, default_value = "")]
    purp: String,

    /// Do not write :60F:/:62F: balances (some tools ignore them)
    #[arg(long)]
    suppress_balances: bool,
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s.as_bytes() {
        [b] if s.is_ascii() => Ok(*b),
        _ => Err(format!(
            "delimiter must be a single ASCII character, got '{}'",
            s
        )),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("ERROR: {}", e);
        std::process::exit(2);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let profile = match cli.profile {
        Some(ref name) => name.parse::<Profile>()?,
        None => Profile::Plain,
    };

    let options = ConvertOptions {
        delimiter: cli.delimiter,
        limit: match cli.limit {
            0 => None,
            n => Some(n),
        },
        profile,
        transaction_code: cli.ttype.clone(),
        eref: cli.eref.clone(),
        purp: cli.purp.clone(),
        suppress_balances: cli.suppress_balances,
        ..ConvertOptions::default()
    };

    let input_path = Path::new(&cli.input_csv);
    if !input_path.is_file() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("input CSV not found: {}", cli.input_csv),
        )));
    }
    let output_dir = match Path::new(&cli.output_sta).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    if !output_dir.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("output directory does not exist: {}", output_dir.display()),
        )));
    }

    println!("----- > Start processing");

    let raw = fs::read(input_path)?;
    let decoded = decode(&raw, &cli.encoding)?;
    let statement = conversion::csv_to_mt940(&mut decoded.as_bytes(), &options)?;

    // The output file only exists once the whole conversion succeeded.
    let mut output = File::create(&cli.output_sta)?;
    statement.write_to(&mut output)?;

    println!("----- < end processing");
    println!("----- | end conversion");

    if cli.debug {
        println!("\nDEBUG SUMMARY (first rows):");
        print_table(&debug_rows(&decoded, &options)?, &DEBUG_HEADERS);
        println!(
            "\nTotal bookings processed: {}",
            statement.transaction_count()
        );
    }

    Ok(())
}

/// Decode the raw input bytes per the `--encoding` flag.
///
/// Latin-1 maps every byte to the code point of the same value, so it
/// cannot fail; UTF-8 rejects invalid sequences.
fn decode(bytes: &[u8], encoding: &str) -> Result<String> {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => Ok(bytes.iter().map(|&b| b as char).collect()),
        "utf-8" | "utf8" => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Encoding(format!("input is not valid UTF-8: {}", e))),
        other => Err(Error::Encoding(format!("unsupported encoding: {}", other))),
    }
}

const DEBUG_HEADERS: [&str; 7] = [
    "Line#",
    "Value date",
    "Booking date",
    "D/C",
    "Amount",
    "CCY",
    "Comment",
];

/// Re-run the row pipeline over the decoded input to collect the summary
/// table: one row per accepted transaction, dates as they appeared in the
/// file, comment cut to 32 characters.
fn debug_rows(decoded: &str, options: &ConvertOptions) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded.as_bytes());

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        // File line, not record index; the reader drops empty lines.
        let row_number = record.position().map_or(0, |p| p.line() as usize);
        let fields: Vec<String> = record.iter().map(String::from).collect();

        if let Some(tx) = parse_row(&fields, row_number, options)? {
            rows.push(vec![
                row_number.to_string(),
                fields[csv_format::COL_VALUE_DATE].trim().to_string(),
                fields[csv_format::COL_BOOKING_DATE].trim().to_string(),
                tx.direction.code().to_string(),
                tx.amount.clone(),
                tx.currency.clone(),
                truncate_comment(&tx.comment),
            ]);

            if let Some(limit) = options.limit {
                if rows.len() >= limit {
                    break;
                }
            }
        }
    }

    Ok(rows)
}

fn truncate_comment(comment: &str) -> String {
    let chars: Vec<char> = comment.chars().collect();
    if chars.len() > 33 {
        let mut cut: String = chars[..32].iter().collect();
        cut.push('…');
        cut
    } else {
        comment.to_string()
    }
}

/// Print a column-aligned table, every column as wide as its widest cell.
fn print_table(rows: &[Vec<String>], headers: &[&str]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let fmt = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", fmt(headers));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        println!("{}", fmt(&cells));
    }
}
