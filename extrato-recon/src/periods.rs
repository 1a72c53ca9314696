//! Coverage report over the ledger: which statement periods are present,
//! which months are missing between them, and which source documents are no
//! longer in the input directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use extrato_core::{Period, missing_periods};

use crate::ledger::LedgerEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodReport {
    /// Distinct periods, oldest first.
    pub periods: Vec<Period>,
    /// Months absent between consecutive periods.
    pub gaps: Vec<Period>,
    /// Documents referenced by the ledger but missing on disk, with the
    /// first period they were seen under.
    pub missing_documents: Vec<(String, Option<Period>)>,
}

pub fn period_report(ledger: &[LedgerEntry], input_dir: &Path) -> PeriodReport {
    let periods: Vec<Period> = ledger
        .iter()
        .filter_map(|e| e.period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut documents: BTreeMap<&str, Option<Period>> = BTreeMap::new();
    for e in ledger.iter().filter(|e| !e.source_document.is_empty()) {
        documents.entry(e.source_document.as_str()).or_insert(e.period);
    }

    let missing_documents = documents
        .into_iter()
        .filter(|(name, _)| !input_dir.join(name).exists())
        .map(|(name, period)| (name.to_string(), period))
        .collect();

    PeriodReport {
        gaps: missing_periods(&periods),
        periods,
        missing_documents,
    }
}
