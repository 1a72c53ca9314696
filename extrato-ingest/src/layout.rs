//! Vocabulary of one statement layout family.

use serde::{Deserialize, Serialize};

/// Markers the extractor keys on. Defaults describe the Santander
/// "Extrato Consolidado Mensal" layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementLayout {
    /// A line containing this opens the transaction block.
    pub header_keyword: String,
    /// Compared against a line with spaces removed, case-insensitively, as a prefix.
    pub trailer_marker: String,
    /// Running-balance rows inside the block.
    pub balance_row_prefixes: Vec<String>,
    /// Lines carrying one of these wrap onto a second physical line.
    pub continuation_markers: Vec<String>,
    /// Word prefix of a balance anchor, directly followed by `dd/mm`.
    pub anchor_label: String,
    /// Precedes `- mês/aaaa` in the summary heading.
    pub summary_marker: String,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            header_keyword: "Movimentação".to_string(),
            trailer_marker: "sevocênãotem".to_string(),
            balance_row_prefixes: vec!["SALDOEM".to_string(), "SALDO EM".to_string()],
            continuation_markers: vec![
                "TRANSFERENCIAPROGRAMADA".to_string(),
                "TRANSFPROGDIFERENTETITULARIDADE".to_string(),
            ],
            anchor_label: "SaldodeContaCorrenteem".to_string(),
            summary_marker: "Resumo".to_string(),
        }
    }
}
