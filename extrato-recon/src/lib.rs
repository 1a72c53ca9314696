//! extrato-recon: ledger persistence and reconciliation of expected entries
//! against extracted statement transactions.

pub mod error;
pub mod ledger;
pub mod matcher;
pub mod periods;
pub mod reference;
pub mod report;

pub use error::ReconError;
pub use ledger::{LedgerEntry, backup_ledger, read_ledger, read_ledger_from, write_ledger, write_ledger_to};
pub use matcher::{
    AbstainDisambiguator, Decision, DisambiguationRequest, Disambiguator, MatchOptions,
    MatchOutcome, MatchedLine, ReconciliationResult, ReconciliationSummary, Reconciler,
    ScriptedDisambiguator, parse_decision, reconcile,
};
pub use periods::{PeriodReport, period_report};
pub use reference::{
    ReferenceEntry, ReferenceTable, load_reference, parse_reference_amount, read_reference,
};
pub use report::{write_report, write_report_to};
