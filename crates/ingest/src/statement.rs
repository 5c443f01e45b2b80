//! Statement ingestion: heterogeneous delimited exports in, uniform
//! transaction records out. Malformed rows are skipped, never fatal.

use chrono::{Datelike, NaiveDate};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use centavo_core::{Money, Month, Transaction};

use crate::layout::{find_header_row, ColumnLayout, Delimiter};

/// Descriptions containing any of these are income or transfers, not
/// spending, and are excluded from ingestion entirely.
pub const INCOME_TRANSFER_KEYWORDS: &[&str] = &[
    "PAYROLL",
    "ZELLE PAYMENT FROM",
    "TRANSFER",
    "OVERDRAFT PROTECTION",
    "DEPOSIT",
    "CREDIT CARD BILL PAYMENT",
    "CITI AUTOPAY",
    "AUTOPAY",
    "ONLINE BANKING PAYMENT",
    "ONLINE PAYMENT",
    "BANK OF AMERICA CREDIT CARD BILL PAYMENT",
    "BA ELECTRONIC PAYMENT",
    "FID BKG SVC",
    "BEGINNING BALANCE",
];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// When set, rows dated outside this month are dropped.
    pub month: Option<Month>,
}

/// Read and ingest one statement file from disk.
pub fn ingest_file(path: &Path, options: &IngestOptions) -> Result<Vec<Transaction>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("statement")
        .to_string();
    Ok(ingest(&content, &source, options))
}

/// Parse one statement export into transactions. Stateless and re-invocable
/// per file; a file yielding zero rows after filtering produces an empty
/// vector, not an error.
pub fn ingest(content: &str, source: &str, options: &IngestOptions) -> Vec<Transaction> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Vec::new();
    }

    let delimiter = Delimiter::detect(&lines);
    let joined = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(joined.as_bytes());

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(err) => debug!(source, row, %err, "skipping unreadable row"),
        }
    }
    if records.is_empty() {
        return Vec::new();
    }

    // The header row defaults to row 0 when none is recognizable; the
    // mapper then falls back to positional columns.
    let header_row = find_header_row(&records).unwrap_or(0);
    let layout = ColumnLayout::from_header(&records[header_row]);

    let mut transactions = Vec::new();
    for (row, record) in records.iter().enumerate().skip(header_row + 1) {
        let Some(date) = parse_date(field(record, layout.date)) else {
            debug!(source, row, "skipping row with unparseable date");
            continue;
        };

        let description = field(record, layout.description);
        if description.is_empty() {
            debug!(source, row, "skipping row with empty description");
            continue;
        }

        let Some(amount) = row_amount(&layout, record) else {
            debug!(source, row, "skipping row with unparseable amount");
            continue;
        };

        if is_income_or_transfer(description) {
            debug!(source, row, description, "excluding income/transfer row");
            continue;
        }
        if amount.is_zero() {
            debug!(source, row, "excluding zero-amount row");
            continue;
        }
        if let Some(month) = options.month {
            if !month.contains(date) {
                continue;
            }
        }

        transactions.push(Transaction {
            date,
            description: description.to_string(),
            amount,
            source_file: source.to_string(),
        });
    }

    transactions
}

pub fn is_income_or_transfer(description: &str) -> bool {
    let upper = description.to_uppercase();
    INCOME_TRANSFER_KEYWORDS.iter().any(|k| upper.contains(k))
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).map(str::trim).unwrap_or("")
}

/// Fold the row's amount fields into one signed amount. A debit/credit pair
/// maps a non-empty debit to a negative amount and a non-empty credit to a
/// positive one; otherwise the single amount column is used as-is.
fn row_amount(layout: &ColumnLayout, record: &csv::StringRecord) -> Option<Money> {
    if layout.debit.is_some() || layout.credit.is_some() {
        let debit = match layout.debit.map(|i| field(record, i)).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_amount(raw).ok()?),
            None => None,
        };
        let credit = match layout.credit.map(|i| field(record, i)).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_amount(raw).ok()?),
            None => None,
        };
        let amount = match (debit, credit) {
            (Some(d), None) => -d.abs(),
            (None, Some(c)) => c.abs(),
            (Some(d), Some(c)) => c - d,
            (None, None) => return None,
        };
        Some(Money::from_decimal(amount))
    } else {
        let raw = field(record, layout.amount?);
        if raw.is_empty() {
            return None;
        }
        parse_amount(raw).ok().map(Money::from_decimal)
    }
}

/// Accepted forms: `M/D/YYYY`, `M/D/YY` (two-digit years are 2000s), and
/// `YYYY-M-D`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%y") {
        // chrono maps 69-99 to the 1900s; statement exports mean the 2000s.
        return if date.year() < 2000 {
            date.with_year(date.year() + 100)
        } else {
            Some(date)
        };
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Strip currency symbols, thousands separators, and accounting
/// parentheses, then parse as an exact decimal.
fn parse_amount(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    let raw = raw.trim();
    let (negative, raw) = if raw.starts_with('(') && raw.ends_with(')') {
        (true, &raw[1..raw.len() - 1])
    } else {
        (false, raw)
    };
    let cleaned = raw.replace([',', '$', ' '], "");
    let value = Decimal::from_str(&cleaned)?;
    Ok(if negative { -value } else { value })
}
