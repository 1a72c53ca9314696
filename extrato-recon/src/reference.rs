//! Expected ledger entries (`referencia.csv`).
//!
//! Only the amount and month columns are interpreted; every other column is
//! carried through to the report untouched.

use std::fs::File;
use std::io;
use std::path::Path;

use extrato_core::parse_localized_amount;
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{ReconError, Result};

const CURRENCY_MARKER: &str = "R$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// 0-based data row in the reference file.
    pub row: usize,
    /// Cell values aligned with [`ReferenceTable::headers`]; the month cell
    /// holds the zero-padded month.
    pub values: Vec<String>,
    /// Always an outflow: `-|amount|`.
    pub expected_amount: Decimal,
    pub expected_month: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
    pub headers: Vec<String>,
    pub entries: Vec<ReferenceEntry>,
    /// Rows dropped because their amount did not parse.
    pub dropped: usize,
}

impl ReferenceTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn value<'a>(&self, entry: &'a ReferenceEntry, name: &str) -> Option<&'a str> {
        self.column(name)
            .and_then(|i| entry.values.get(i))
            .map(String::as_str)
    }
}

/// Normalize a reference amount to the negative-outflow convention.
///
/// `R$ 1.234,56` → `-1234.56`. `None` when nothing numeric remains.
pub fn parse_reference_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .replace(CURRENCY_MARKER, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    parse_localized_amount(&cleaned).ok().map(|v| -v.abs())
}

fn zero_pad_month(raw: &str) -> String {
    if raw.is_empty() {
        String::new()
    } else {
        format!("{raw:0>2}")
    }
}

pub fn read_reference<R: io::Read>(
    reader: R,
    amount_column: &str,
    month_column: &str,
) -> Result<ReferenceTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn(name.to_string()))
    };
    let amount_idx = find(amount_column)?;
    let month_idx = find(month_column)?;

    let mut table = ReferenceTable {
        headers: headers.clone(),
        ..Default::default()
    };

    for (row, record) in rdr.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(line = row + 2, error = %e, "unreadable reference row dropped");
                table.dropped += 1;
                continue;
            }
        };
        let mut values: Vec<String> = (0..headers.len())
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();

        let Some(expected_amount) = parse_reference_amount(&values[amount_idx]) else {
            warn!(line = row + 2, valor = %values[amount_idx], "reference row without a usable amount dropped");
            table.dropped += 1;
            continue;
        };

        let expected_month = zero_pad_month(&values[month_idx]);
        values[month_idx] = expected_month.clone();

        table.entries.push(ReferenceEntry {
            row,
            values,
            expected_amount,
            expected_month,
        });
    }

    Ok(table)
}

pub fn load_reference(path: &Path, amount_column: &str, month_column: &str) -> Result<ReferenceTable> {
    read_reference(File::open(path)?, amount_column, month_column)
}
