//! Reconciliation report (`verificacao_saida.csv`): the reference columns
//! followed by Encontrado, Linha_extrato, valor_extrato, descricao_raw.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io;
use std::path::Path;

use extrato_core::format_amount;

use crate::error::Result;
use crate::matcher::ReconciliationResult;
use crate::reference::ReferenceTable;

const RESULT_COLUMNS: [&str; 4] = ["Encontrado", "Linha_extrato", "valor_extrato", "descricao_raw"];

pub fn write_report_to<W: io::Write>(
    writer: W,
    table: &ReferenceTable,
    results: &[ReconciliationResult],
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header: Vec<&str> = table
        .headers
        .iter()
        .map(String::as_str)
        .chain(RESULT_COLUMNS)
        .collect();
    wtr.write_record(&header)?;

    let by_row: HashMap<usize, &ReconciliationResult> =
        results.iter().map(|r| (r.reference_row, r)).collect();

    for entry in &table.entries {
        let Some(result) = by_row.get(&entry.row) else {
            continue;
        };
        let mut record: Vec<String> = entry.values.clone();
        match &result.matched {
            Some(m) => record.extend([
                "Sim".to_string(),
                m.statement_line().to_string(),
                format_amount(m.amount),
                m.raw_description.clone(),
            ]),
            None => record.extend([
                "Não".to_string(),
                String::new(),
                String::new(),
                String::new(),
            ]),
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_report(path: &Path, table: &ReferenceTable, results: &[ReconciliationResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_report_to(File::create(path)?, table, results)
}
