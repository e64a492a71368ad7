//! csv2mt940 Converter Library
//!
//! A library for converting ';'-separated card transaction CSV exports
//! into MT940 bank statement files (`.sta`).
//!
//! # Pipeline
//!
//! - [`csv_format`]: interprets raw CSV rows (fixed column layout, header/
//!   footer skip rules) into [`Transaction`] values
//! - [`mt940_format`]: renders transactions into `:61:`/`:86:` blocks and
//!   assembles the complete statement
//! - [`conversion`]: drives a whole run over any `Read` source
//!
//! # Examples
//!
//! ## Converting a CSV export file
//!
//! ```no_run
//! use std::fs::File;
//! use csv2mt940::{conversion, ConvertOptions};
//!
//! let options = ConvertOptions::default();
//!
//! let mut input = File::open("export.csv")?;
//! let statement = conversion::csv_to_mt940(&mut input, &options)?;
//!
//! let mut output = File::create("statement.sta")?;
//! statement.write_to(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Selecting the StarMoney narrative profile
//!
//! ```no_run
//! use std::fs::File;
//! use csv2mt940::{conversion, ConvertOptions, Profile};
//!
//! let options = ConvertOptions {
//!     profile: Profile::StarMoney,
//!     eref: "E2E-42".to_string(),
//!     ..ConvertOptions::default()
//! };
//!
//! let mut input = File::open("export.csv")?;
//! let statement = conversion::csv_to_mt940(&mut input, &options)?;
//!
//! let mut output = File::create("statement.sta")?;
//! statement.write_to(&mut output)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod csv_format;
pub mod mt940_format;
pub mod conversion;

use std::str::FromStr;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{Direction, SwiftDate, Transaction};

/// Narrative profile controlling the layout of the `:86:` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Wrapped comment lines plus one `"; "`-joined tag line.
    Plain,
    /// Structured `EREF+`/`PURP+`/`SVWZ+` segments for StarMoney imports.
    StarMoney,
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(Profile::Plain),
            "starmoney" => Ok(Profile::StarMoney),
            _ => Err(Error::InvalidProfile(s.to_string())),
        }
    }
}

/// Configuration for one conversion run.
///
/// `Default` matches the converter's CLI defaults: `;` delimiter, no
/// transaction limit, plain narrative profile, `NTRF` transaction code,
/// `NONREF` end-to-end reference, no purpose code, balances written,
/// `EUR` fallback currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// CSV field delimiter.
    pub delimiter: u8,

    /// Convert at most this many transactions; `None` converts all.
    pub limit: Option<usize>,

    /// Narrative profile for the `:86:` blocks.
    pub profile: Profile,

    /// `:61:` transaction type code under the StarMoney profile.
    pub transaction_code: String,

    /// `EREF+` end-to-end reference; empty falls back to `NONREF`.
    pub eref: String,

    /// `PURP+` SEPA purpose code; empty omits the segment.
    pub purp: String,

    /// Skip the `:60F:`/`:62F:` balance tags.
    pub suppress_balances: bool,

    /// Currency used when a row's currency column is blank.
    pub fallback_currency: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            delimiter: b';',
            limit: None,
            profile: Profile::Plain,
            transaction_code: "NTRF".to_string(),
            eref: "NONREF".to_string(),
            purp: String::new(),
            suppress_balances: false,
            fallback_currency: "EUR".to_string(),
        }
    }
}

impl ConvertOptions {
    /// The transaction type code written into `:61:` lines.
    ///
    /// The configured code applies under the StarMoney profile, trimmed
    /// and upper-cased; plain output always carries the legacy `FCHG`
    /// code.
    pub fn effective_transaction_code(&self) -> String {
        match self.profile {
            Profile::StarMoney => self.transaction_code.trim().to_uppercase(),
            Profile::Plain => "FCHG".to_string(),
        }
    }
}
