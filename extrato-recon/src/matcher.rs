//! Greedy reconciliation of reference entries against ledger rows.
//!
//! Entries are processed in file order. Each one may claim a single unused
//! ledger row from the same month whose amount is within tolerance. A claimed
//! row is gone for every later entry, even one with no other candidate; there
//! is no global re-assignment.
//!
//! A unique candidate is taken automatically. Several candidates go to a
//! [`Disambiguator`], which picks one by ordinal or abstains.

use std::collections::{HashSet, VecDeque};

use rust_decimal::Decimal;
use tracing::debug;

use crate::ledger::LedgerEntry;
use crate::reference::{ReferenceEntry, ReferenceTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Largest accepted `|ledger - expected|`, inclusive.
    pub tolerance: Decimal,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
        }
    }
}

/// Answer to a disambiguation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 1-based position in the candidate list.
    Pick(usize),
    Abstain,
}

/// Context handed to a [`Disambiguator`] when several rows qualify.
#[derive(Debug)]
pub struct DisambiguationRequest<'a> {
    pub entry: &'a ReferenceEntry,
    /// In ledger order.
    pub candidates: Vec<&'a LedgerEntry>,
}

pub trait Disambiguator {
    fn choose(&mut self, request: &DisambiguationRequest<'_>) -> Decision;
}

/// Interpret an operator answer: an ordinal in `1..=candidate_count` picks,
/// anything else (including an empty line) abstains.
pub fn parse_decision(input: &str, candidate_count: usize) -> Decision {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Decision::Abstain;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=candidate_count).contains(&n) => Decision::Pick(n),
        _ => Decision::Abstain,
    }
}

/// Replays prepared answers; abstains once they run out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDisambiguator {
    answers: VecDeque<String>,
    /// Candidate count of every request received.
    pub requests: Vec<usize>,
}

impl ScriptedDisambiguator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            requests: Vec::new(),
        }
    }
}

impl Disambiguator for ScriptedDisambiguator {
    fn choose(&mut self, request: &DisambiguationRequest<'_>) -> Decision {
        self.requests.push(request.candidates.len());
        let answer = self.answers.pop_front().unwrap_or_default();
        parse_decision(&answer, request.candidates.len())
    }
}

/// Never picks; ambiguous entries stay unmatched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbstainDisambiguator;

impl Disambiguator for AbstainDisambiguator {
    fn choose(&mut self, _request: &DisambiguationRequest<'_>) -> Decision {
        Decision::Abstain
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Exactly one candidate, taken automatically.
    Unique,
    /// Picked among several.
    Chosen,
    /// Several candidates, operator abstained.
    Abstained,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedLine {
    pub row: usize,
    pub amount: Decimal,
    pub raw_description: String,
}

impl MatchedLine {
    /// Spreadsheet line of the ledger row (header + 1-based).
    pub fn statement_line(&self) -> usize {
        self.row + 2
    }
}

impl From<&LedgerEntry> for MatchedLine {
    fn from(e: &LedgerEntry) -> Self {
        Self {
            row: e.row,
            amount: e.amount,
            raw_description: e.raw_description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Row of the reference entry this result belongs to.
    pub reference_row: usize,
    pub outcome: MatchOutcome,
    pub matched: Option<MatchedLine>,
}

impl ReconciliationResult {
    pub fn found(&self) -> bool {
        self.matched.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconciliationSummary {
    pub unique: usize,
    pub chosen: usize,
    pub abstained: usize,
    pub not_found: usize,
}

impl ReconciliationSummary {
    pub fn from_results(results: &[ReconciliationResult]) -> Self {
        let mut s = Self::default();
        for r in results {
            match r.outcome {
                MatchOutcome::Unique => s.unique += 1,
                MatchOutcome::Chosen => s.chosen += 1,
                MatchOutcome::Abstained => s.abstained += 1,
                MatchOutcome::NotFound => s.not_found += 1,
            }
        }
        s
    }

    pub fn found(&self) -> usize {
        self.unique + self.chosen
    }

    pub fn total(&self) -> usize {
        self.found() + self.abstained + self.not_found
    }
}

/// Holds the consumed set for one run.
pub struct Reconciler<'l> {
    ledger: &'l [LedgerEntry],
    options: MatchOptions,
    consumed: HashSet<usize>,
}

impl<'l> Reconciler<'l> {
    pub fn new(ledger: &'l [LedgerEntry], options: MatchOptions) -> Self {
        Self {
            ledger,
            options,
            consumed: HashSet::new(),
        }
    }

    pub fn is_consumed(&self, row: usize) -> bool {
        self.consumed.contains(&row)
    }

    /// Unused rows of the entry's month within tolerance, in ledger order.
    pub fn candidates(&self, entry: &ReferenceEntry) -> Vec<&'l LedgerEntry> {
        self.ledger
            .iter()
            .filter(|t| t.month == entry.expected_month)
            .filter(|t| !self.consumed.contains(&t.row))
            .filter(|t| (t.amount - entry.expected_amount).abs() <= self.options.tolerance)
            .collect()
    }

    pub fn reconcile_entry(
        &mut self,
        entry: &ReferenceEntry,
        disambiguator: &mut dyn Disambiguator,
    ) -> ReconciliationResult {
        let candidates = self.candidates(entry);

        let (outcome, picked) = match candidates.len() {
            0 => (MatchOutcome::NotFound, None),
            1 => (MatchOutcome::Unique, Some(candidates[0])),
            n => {
                let request = DisambiguationRequest {
                    entry,
                    candidates,
                };
                match disambiguator.choose(&request) {
                    Decision::Pick(k) if (1..=n).contains(&k) => {
                        (MatchOutcome::Chosen, Some(request.candidates[k - 1]))
                    }
                    _ => (MatchOutcome::Abstained, None),
                }
            }
        };

        if let Some(t) = picked {
            self.consumed.insert(t.row);
            debug!(reference_row = entry.row, ledger_line = t.statement_line(), "matched");
        }

        ReconciliationResult {
            reference_row: entry.row,
            outcome,
            matched: picked.map(MatchedLine::from),
        }
    }

    pub fn run(
        &mut self,
        entries: &[ReferenceEntry],
        disambiguator: &mut dyn Disambiguator,
    ) -> Vec<ReconciliationResult> {
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            results.push(self.reconcile_entry(entry, disambiguator));
        }
        results
    }
}

/// One result per reference entry, in reference order.
pub fn reconcile(
    table: &ReferenceTable,
    ledger: &[LedgerEntry],
    options: MatchOptions,
    disambiguator: &mut dyn Disambiguator,
) -> Vec<ReconciliationResult> {
    Reconciler::new(ledger, options).run(&table.entries, disambiguator)
}
