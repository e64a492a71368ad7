//! MT940 statement assembly and serialization.
//!
//! MT940 is a SWIFT-style tag-based format for electronic account
//! statements. This module renders converted transactions into
//! `:61:`/`:86:` blocks, accumulates them, and writes the complete
//! statement file.

use crate::error::Result;
use crate::types::{SwiftDate, Transaction};
use crate::{ConvertOptions, Profile};
use chrono::Local;
use std::io::Write;

/// MT940 files use CRLF line ends throughout.
const CRLF: &str = "\r\n";

/// Byte-order marker leading the output file.
const BOM: char = '\u{feff}';

/// Maximum characters per `:86:` narrative line.
const NARRATIVE_WIDTH: usize = 65;

/// Maximum narrative lines per `:86:` block.
const NARRATIVE_LINES: usize = 6;

/// Accumulates converted transactions and serializes the final statement.
///
/// The statement is filled row-by-row through [`push`](Self::push) and
/// written exactly once with [`write_to`](Self::write_to). Bodies are
/// kept in acceptance order and written newest-first. The `:60F:` opening
/// balance carries the *last* accepted row's value date and the `:62F:`
/// closing balance the *first*'s; the inversion reproduces the legacy
/// converter and is kept deliberately.
#[derive(Debug, Clone, PartialEq)]
pub struct Mt940Statement {
    /// `:20:`/`:25:`/`:28C:` block, built from the first accepted row.
    header: String,

    /// Value date of the last accepted row, written into `:60F:`.
    opening_date: Option<SwiftDate>,

    /// Value date of the first accepted row, written into `:62F:`.
    closing_date: Option<SwiftDate>,

    /// Currency of the most recently accepted row.
    currency: String,

    /// Skip the `:60F:`/`:62F:` balance tags entirely.
    suppress_balances: bool,

    /// Serialized `:61:`/`:86:` blocks in acceptance order.
    bodies: Vec<String>,
}

impl Mt940Statement {
    /// Create an empty statement configured for one conversion run.
    pub fn new(options: &ConvertOptions) -> Self {
        Mt940Statement {
            header: String::new(),
            opening_date: None,
            closing_date: None,
            currency: options.fallback_currency.clone(),
            suppress_balances: options.suppress_balances,
            bodies: Vec::new(),
        }
    }

    /// Append one converted transaction.
    ///
    /// The first accepted transaction also builds the statement header
    /// and fixes the `:62F:` closing date; every call updates the `:60F:`
    /// opening date and the statement currency.
    pub fn push(&mut self, tx: &Transaction, options: &ConvertOptions) {
        if self.header.is_empty() {
            let stamp = Local::now().format("%Y%m%d%H%M%S");
            let mut header = format!(":20:DateOfConversion{}{}", stamp, CRLF);
            header.push_str(&format!(":25:{}{}", tx.account, CRLF));
            header.push_str(":28C:00001/001");
            header.push_str(CRLF);
            self.header = header;
            self.closing_date = Some(tx.value_date.clone());
        }

        self.opening_date = Some(tx.value_date.clone());
        self.currency = tx.currency.clone();
        self.bodies.push(transaction_body(tx, options));
    }

    /// Number of accepted transactions.
    pub fn transaction_count(&self) -> usize {
        self.bodies.len()
    }

    /// Write the complete statement to any destination implementing `Write`.
    ///
    /// Output order: byte-order marker, header, opening balance (unless
    /// suppressed), transaction bodies newest-first, closing balance
    /// (unless suppressed), one final blank line. The balance amount is
    /// always the `0,0` placeholder. A statement with no transactions
    /// writes only the marker and the blank line.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use csv2mt940::ConvertOptions;
    /// use csv2mt940::mt940_format::Mt940Statement;
    ///
    /// let options = ConvertOptions::default();
    /// let statement = Mt940Statement::new(&options);
    /// let mut file = File::create("output.sta")?;
    /// statement.write_to(&mut file)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write!(writer, "{}", BOM)?;
        write!(writer, "{}", self.header)?;

        if !self.suppress_balances {
            if let Some(ref date) = self.opening_date {
                write!(writer, ":60F:C{}{}0,0{}", date.ddmmyy(), self.currency, CRLF)?;
            }
        }

        for body in self.bodies.iter().rev() {
            write!(writer, "{}", body)?;
        }

        if !self.suppress_balances {
            if let Some(ref date) = self.closing_date {
                write!(writer, ":62F:C{}{}0,0{}", date.ddmmyy(), self.currency, CRLF)?;
            }
        }

        write!(writer, "{}", CRLF)?;
        Ok(())
    }
}

/// Build the `:61:` + `:86:` block for one transaction.
fn transaction_body(tx: &Transaction, options: &ConvertOptions) -> String {
    let mut body = format!(
        ":61:{}{}{}{}{}NONREF//NONREF{}",
        tx.value_date.yymmdd(),
        tx.booking_date.mmdd(),
        tx.direction.code(),
        tx.amount,
        options.effective_transaction_code(),
        CRLF
    );
    body.push_str(":86:");
    body.push_str(&narrative_lines(tx, options).join(CRLF));
    body.push_str(CRLF);
    body
}

/// Narrative lines for the `:86:` block, per the active profile.
fn narrative_lines(tx: &Transaction, options: &ConvertOptions) -> Vec<String> {
    match options.profile {
        Profile::Plain => plain_narrative(tx),
        Profile::StarMoney => starmoney_narrative(tx, options),
    }
}

/// Wrapped comment plus one trailing `"; "`-joined tag line.
///
/// Empty wrap lines are dropped. Comment and tag line share the six-line
/// block, so the tag line is dropped when the comment already fills it.
fn plain_narrative(tx: &Transaction) -> Vec<String> {
    let mut lines: Vec<String> = wrap_86(&tx.comment, NARRATIVE_WIDTH, NARRATIVE_LINES)
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect();
    if !tx.tags.is_empty() {
        lines.push(tx.tags.join("; "));
    }
    lines.truncate(NARRATIVE_LINES);
    lines
}

/// `EREF+`/`PURP+` reference line followed by the `SVWZ+` purpose text.
///
/// Both segments share the six-line block: the purpose text only gets
/// the lines the reference segment left over.
fn starmoney_narrative(tx: &Transaction, options: &ConvertOptions) -> Vec<String> {
    let eref = if options.eref.is_empty() {
        "NONREF"
    } else {
        options.eref.as_str()
    };
    let purp = options.purp.trim();

    let mut reference = format!("EREF+{}", eref);
    if !purp.is_empty() {
        reference.push_str(" PURP+");
        reference.push_str(purp);
    }

    let mut lines = wrap_86(&reference, NARRATIVE_WIDTH, NARRATIVE_LINES);
    let budget = NARRATIVE_LINES - lines.len();
    lines.extend(wrap_86(
        &format!("SVWZ+{}", tx.comment),
        NARRATIVE_WIDTH,
        budget,
    ));
    lines
}

/// Collapse whitespace runs in `text` to single spaces and split the
/// result into at most `max_lines` chunks of at most `width` characters.
///
/// Text beyond the last line is dropped: `:86:` is a fixed-size field,
/// so overflow is cut rather than reported. Chunks count characters,
/// not bytes. Empty input yields one empty line, still subject to the
/// `max_lines` cap.
fn wrap_86(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = collapsed.chars().collect();

    let mut lines: Vec<String> = chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines.truncate(max_lines);
    lines
}
