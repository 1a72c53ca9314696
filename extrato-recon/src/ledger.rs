//! The extracted ledger as CSV (`movimentacoes.csv`).
//!
//! Header: data,valor,via,tipo,contraparte,descricao_raw,periodo,arquivo

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use extrato_core::{Channel, DayMonth, Direction, Period, Transaction, format_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    data: DayMonth,
    valor: String,
    via: Channel,
    tipo: Direction,
    contraparte: &'a str,
    descricao_raw: &'a str,
    periodo: Option<Period>,
    arquivo: &'a str,
}

impl<'a> From<&'a Transaction> for LedgerRow<'a> {
    fn from(t: &'a Transaction) -> Self {
        Self {
            data: t.date,
            valor: format_amount(t.amount),
            via: t.channel,
            tipo: t.direction,
            contraparte: &t.counterparty,
            descricao_raw: &t.raw_description,
            periodo: t.period,
            arquivo: &t.source_document,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LedgerRecord {
    data: String,
    valor: String,
    #[serde(default)]
    descricao_raw: String,
    #[serde(default)]
    periodo: String,
    #[serde(default)]
    arquivo: String,
}

/// A ledger row as the reconciler sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// 0-based data row; the spreadsheet line is `row + 2`.
    pub row: usize,
    pub date: String,
    /// Zero-padded month taken from `date`, empty when `date` has none.
    pub month: String,
    pub amount: Decimal,
    pub raw_description: String,
    pub period: Option<Period>,
    pub source_document: String,
}

impl LedgerEntry {
    /// View freshly extracted transactions as ledger rows, in order.
    pub fn from_transactions(txns: &[Transaction]) -> Vec<LedgerEntry> {
        txns.iter()
            .enumerate()
            .map(|(row, t)| LedgerEntry {
                row,
                date: t.date.to_string(),
                month: t.date.month_key(),
                amount: t.amount,
                raw_description: t.raw_description.clone(),
                period: t.period,
                source_document: t.source_document.clone(),
            })
            .collect()
    }

    pub fn statement_line(&self) -> usize {
        self.row + 2
    }
}

/// Second `/`-separated component of a date, left-padded with zeros.
pub(crate) fn month_of(date: &str) -> String {
    date.split('/')
        .nth(1)
        .map(|m| format!("{:0>2}", m.trim()))
        .unwrap_or_default()
}

pub fn write_ledger_to<W: io::Write>(writer: W, txns: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if txns.is_empty() {
        wtr.write_record([
            "data",
            "valor",
            "via",
            "tipo",
            "contraparte",
            "descricao_raw",
            "periodo",
            "arquivo",
        ])?;
    }
    for t in txns {
        wtr.serialize(LedgerRow::from(t))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the ledger, creating parent directories as needed.
pub fn write_ledger(path: &Path, txns: &[Transaction]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_ledger_to(File::create(path)?, txns)
}

/// Re-read a ledger. Rows that cannot be read or whose `valor` is not a
/// number are dropped with a warning; row numbering still counts them.
pub fn read_ledger_from<R: io::Read>(reader: R) -> Result<Vec<LedgerEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for (row, result) in rdr.deserialize::<LedgerRecord>().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line = row + 2, error = %e, "unreadable ledger row skipped");
                continue;
            }
        };

        let amount = match Decimal::from_str(&record.valor) {
            Ok(a) => a,
            Err(_) => {
                warn!(line = row + 2, valor = %record.valor, "non-numeric ledger amount skipped");
                continue;
            }
        };

        entries.push(LedgerEntry {
            row,
            month: month_of(&record.data),
            date: record.data,
            amount,
            raw_description: record.descricao_raw,
            period: record.periodo.parse().ok(),
            source_document: record.arquivo,
        });
    }
    Ok(entries)
}

pub fn read_ledger(path: &Path) -> Result<Vec<LedgerEntry>> {
    read_ledger_from(File::open(path)?)
}

/// Move an existing ledger into `backup_dir` before it is regenerated.
/// Returns the backup path, or `None` when there was nothing to move.
pub fn backup_ledger(ledger: &Path, backup_dir: &Path) -> Result<Option<PathBuf>> {
    if !ledger.is_file() {
        return Ok(None);
    }
    fs::create_dir_all(backup_dir)?;
    let target = backup_dir.join(ledger.file_name().unwrap_or(ledger.as_os_str()));
    if fs::rename(ledger, &target).is_err() {
        // rename fails across filesystems
        fs::copy(ledger, &target)?;
        fs::remove_file(ledger)?;
    }
    Ok(Some(target))
}
