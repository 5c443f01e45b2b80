//! Delimiter and column-layout detection for heterogeneous statement
//! exports. Neither the delimiter nor the presence of a header row is
//! guaranteed, so both are inferred from the first few rows.

use csv::StringRecord;

/// Lines sampled when counting delimiter candidates.
const DELIMITER_SAMPLE_LINES: usize = 3;

/// Rows scanned when looking for a header row.
pub const HEADER_SCAN_ROWS: usize = 10;

// Positional fallback, matching the most common export layout.
const POS_DATE: usize = 0;
const POS_NOTES: usize = 1;
const POS_DESCRIPTION: usize = 2;
const POS_PAYMENT_METHOD: usize = 3;
const POS_AMOUNT: usize = 4;

const DATE_NAMES: &[&str] = &["date"];
const DESCRIPTION_NAMES: &[&str] = &["payee", "description", "merchant", "vendor"];
const AMOUNT_NAMES: &[&str] = &["amount", "total"];
const DEBIT_NAMES: &[&str] = &["debit"];
const CREDIT_NAMES: &[&str] = &["credit"];
const PAYMENT_METHOD_NAMES: &[&str] = &["payment"];
const NOTES_NAMES: &[&str] = &["note", "memo"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Pipe,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Pipe => b'|',
        }
    }

    /// Count pipes against commas over the first few lines; pipe wins only
    /// when it appears more often and at least once.
    pub fn detect(lines: &[&str]) -> Self {
        let sample = lines.iter().take(DELIMITER_SAMPLE_LINES);
        let (mut pipes, mut commas) = (0usize, 0usize);
        for line in sample {
            pipes += line.matches('|').count();
            commas += line.matches(',').count();
        }
        if pipes > commas && pipes > 0 {
            Delimiter::Pipe
        } else {
            Delimiter::Comma
        }
    }
}

/// Resolved column indices for one statement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub description: usize,
    /// Single signed amount column; absent when the export splits the
    /// amount into a debit/credit pair.
    pub amount: Option<usize>,
    pub debit: Option<usize>,
    pub credit: Option<usize>,
    pub payment_method: Option<usize>,
    pub notes: Option<usize>,
}

impl ColumnLayout {
    /// Fixed positional layout for headerless or unrecognized exports.
    pub fn positional() -> Self {
        ColumnLayout {
            date: POS_DATE,
            description: POS_DESCRIPTION,
            amount: Some(POS_AMOUNT),
            debit: None,
            credit: None,
            payment_method: Some(POS_PAYMENT_METHOD),
            notes: Some(POS_NOTES),
        }
    }

    /// Map header tokens to logical fields by case-insensitive substring
    /// against a fixed vocabulary; each column is claimed by at most one
    /// field and the first candidate wins. Unmatched required fields fall
    /// back to their positional index.
    pub fn from_header(header: &StringRecord) -> Self {
        let mut date = None;
        let mut description = None;
        let mut amount = None;
        let mut debit = None;
        let mut credit = None;
        let mut payment_method = None;
        let mut notes = None;

        for (i, cell) in header.iter().enumerate() {
            let cell = cell.trim().to_lowercase();
            if cell.is_empty() {
                continue;
            }
            // Debit/credit before amount: "Debit Amount" is a debit column.
            let slot = if contains_any(&cell, DATE_NAMES) {
                &mut date
            } else if contains_any(&cell, DEBIT_NAMES) {
                &mut debit
            } else if contains_any(&cell, CREDIT_NAMES) {
                &mut credit
            } else if contains_any(&cell, AMOUNT_NAMES) {
                &mut amount
            } else if contains_any(&cell, DESCRIPTION_NAMES) {
                &mut description
            } else if contains_any(&cell, PAYMENT_METHOD_NAMES) {
                &mut payment_method
            } else if contains_any(&cell, NOTES_NAMES) {
                &mut notes
            } else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(i);
            }
        }

        let has_split_amount = debit.is_some() || credit.is_some();
        ColumnLayout {
            date: date.unwrap_or(POS_DATE),
            description: description.unwrap_or(POS_DESCRIPTION),
            amount: if has_split_amount {
                amount
            } else {
                Some(amount.unwrap_or(POS_AMOUNT))
            },
            debit,
            credit,
            payment_method: payment_method.or(Some(POS_PAYMENT_METHOD)),
            notes: notes.or(Some(POS_NOTES)),
        }
    }
}

/// Scan the first rows for one that names a date-like, an amount-like, and
/// a description-like column together. `None` means no recognizable header.
pub fn find_header_row(records: &[StringRecord]) -> Option<usize> {
    records
        .iter()
        .take(HEADER_SCAN_ROWS)
        .position(|record| {
            let mut has_date = false;
            let mut has_amount = false;
            let mut has_description = false;
            for cell in record.iter() {
                let cell = cell.trim().to_lowercase();
                has_date |= contains_any(&cell, DATE_NAMES);
                has_amount |= contains_any(&cell, AMOUNT_NAMES)
                    || contains_any(&cell, DEBIT_NAMES)
                    || contains_any(&cell, CREDIT_NAMES);
                has_description |= contains_any(&cell, DESCRIPTION_NAMES);
            }
            has_date && has_amount && has_description
        })
}

fn contains_any(cell: &str, names: &[&str]) -> bool {
    names.iter().any(|name| cell.contains(name))
}
