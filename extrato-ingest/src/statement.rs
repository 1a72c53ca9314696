//! Statement extraction: one document end to end, and a directory batch.
//!
//! Per document: period label, balance anchors, block lines, transactions,
//! then `opening + sum(amounts)` is compared against `closing`. A mismatch
//! is logged and reported, never fatal.

use std::path::Path;
use std::str::FromStr;

use extrato_core::{Period, Transaction};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::document::{Document, list_documents};
use crate::error::IngestError;
use crate::layout::StatementLayout;
use crate::parsers::{BalanceAnchors, TransactionParser, block_lines, read_balance_anchors};
use crate::recognizers::Recognizers;

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub layout: StatementLayout,
    /// Largest tolerated gap between anchors and extracted total.
    pub balance_threshold: Decimal,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            layout: StatementLayout::default(),
            balance_threshold: Decimal::new(5, 2),
        }
    }
}

/// Outcome of the anchor consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceCheck {
    pub anchors: BalanceAnchors,
    pub extracted_total: Decimal,
    /// `|opening + extracted_total - closing|`
    pub difference: Decimal,
    pub threshold: Decimal,
}

impl BalanceCheck {
    pub fn new(anchors: BalanceAnchors, extracted_total: Decimal, threshold: Decimal) -> Self {
        let difference =
            (anchors.opening_balance + extracted_total - anchors.closing_balance).abs();
        Self {
            anchors,
            extracted_total,
            difference,
            threshold,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.difference <= self.threshold
    }
}

#[derive(Debug, Clone)]
pub struct StatementExtraction {
    pub document: String,
    pub period: Period,
    pub balance: BalanceCheck,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub document: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchExtraction {
    pub statements: Vec<StatementExtraction>,
    pub skipped: Vec<SkippedDocument>,
}

impl BatchExtraction {
    /// All transactions, statement after statement, in document order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.statements
            .iter()
            .flat_map(|s| s.transactions.iter().cloned())
            .collect()
    }

    pub fn mismatched(&self) -> impl Iterator<Item = &StatementExtraction> {
        self.statements.iter().filter(|s| !s.balance.is_consistent())
    }
}

pub struct StatementExtractor {
    options: ExtractOptions,
    recognizers: Recognizers,
}

impl StatementExtractor {
    pub fn new(options: ExtractOptions) -> Result<Self, IngestError> {
        let recognizers = Recognizers::new(&options.layout)?;
        Ok(Self {
            options,
            recognizers,
        })
    }

    /// Period label from the first page carrying the summary heading.
    pub fn extract_period(&self, doc: &Document) -> Result<Period, IngestError> {
        let label = doc
            .pages
            .iter()
            .find_map(|p| self.recognizers.period_label(p.text()))
            .ok_or_else(|| IngestError::PeriodNotFound {
                marker: self.options.layout.summary_marker.clone(),
            })?;
        Ok(Period::from_str(&label.to_lowercase())?)
    }

    /// Transactions of the block, untagged.
    pub fn extract_transactions(&self, doc: &Document) -> Vec<Transaction> {
        let layout = &self.options.layout;
        TransactionParser::new(&self.recognizers, layout).parse(block_lines(doc, layout))
    }

    pub fn extract_document(&self, doc: &Document) -> Result<StatementExtraction, IngestError> {
        let period = self.extract_period(doc)?;
        let anchors = read_balance_anchors(doc, &self.options.layout.anchor_label)?;
        let transactions: Vec<Transaction> = self
            .extract_transactions(doc)
            .into_iter()
            .map(|t| t.tagged(period, doc.name.clone()))
            .collect();

        let total: Decimal = transactions.iter().map(|t| t.amount).sum();
        let balance = BalanceCheck::new(anchors, total, self.options.balance_threshold);
        if !balance.is_consistent() {
            warn!(
                document = %doc.name,
                difference = %balance.difference,
                threshold = %balance.threshold,
                "extracted total does not reconcile with balance anchors"
            );
        }

        Ok(StatementExtraction {
            document: doc.name.clone(),
            period,
            balance,
            transactions,
        })
    }

    pub fn extract_file(&self, path: &Path) -> Result<StatementExtraction, IngestError> {
        let doc = Document::load(path)?;
        self.extract_document(&doc)
    }

    /// Extract every statement in `dir`. Only an unreadable directory is an
    /// error; a failing document is skipped and recorded.
    pub fn extract_directory(&self, dir: &Path) -> Result<BatchExtraction, IngestError> {
        let mut batch = BatchExtraction::default();

        for path in list_documents(dir)? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.extract_file(&path) {
                Ok(extraction) => {
                    info!(
                        document = %name,
                        period = %extraction.period,
                        transactions = extraction.transactions.len(),
                        "statement extracted"
                    );
                    batch.statements.push(extraction);
                }
                Err(e) => {
                    warn!(document = %name, error = %e, "statement skipped");
                    batch.skipped.push(SkippedDocument {
                        document: name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn statement(closing: &str) -> String {
        format!(
            "Fale Conosco\nResumo - Março/2025\n\
             SaldodeContaCorrenteem28/02 1.000,00\n\
             SaldodeContaCorrenteem31/03 {closing}\n\u{c}\
             Movimentação\n\
             SALDO EM 28/02 1.000,00\n\
             05/03PIXRECEBIDOMARIA SILVA 150,00\n\
             06/03 PIXENVIADOJOAO 300,00-\n\
             Se você não tem dúvidas\n"
        )
    }

    #[test]
    fn test_extract_document_tags_transactions() {
        let extractor = StatementExtractor::new(ExtractOptions::default()).unwrap();
        let doc = Document::from_text("mar.pdf", &statement("850,00"));
        let ex = extractor.extract_document(&doc).unwrap();

        assert_eq!(ex.period.to_string(), "março/2025");
        assert_eq!(ex.transactions.len(), 2);
        assert!(ex.balance.is_consistent());
        for t in &ex.transactions {
            assert_eq!(t.period, Some(ex.period));
            assert_eq!(t.source_document, "mar.pdf");
        }
    }

    #[test]
    fn test_balance_mismatch_still_returns_transactions() {
        let extractor = StatementExtractor::new(ExtractOptions::default()).unwrap();
        let doc = Document::from_text("mar.pdf", &statement("800,00"));
        let ex = extractor.extract_document(&doc).unwrap();

        assert_eq!(ex.balance.extracted_total, dec("-150.00"));
        assert_eq!(ex.balance.difference, dec("50.00"));
        assert!(!ex.balance.is_consistent());
        assert_eq!(ex.transactions.len(), 2);

        let batch = BatchExtraction {
            statements: vec![ex],
            skipped: Vec::new(),
        };
        let flagged: Vec<&str> = batch.mismatched().map(|s| s.document.as_str()).collect();
        assert_eq!(flagged, ["mar.pdf"]);
        assert_eq!(batch.transactions().len(), 2);
    }

    #[test]
    fn test_multi_page_document() {
        let extractor = StatementExtractor::new(ExtractOptions::default()).unwrap();
        let doc = Document::from_pages(
            "abr.pdf",
            vec![
                "Extrato Consolidado\nSaldodeContaCorrenteem31/03 100,00",
                "Resumo - Abril/2025\nSaldodeContaCorrenteem30/04 90,00\nResumo - maio/2025",
                "Movimentação\n02/04 TARIFA 10,00-\nSe você não tem dúvidas",
            ],
        );
        let ex = extractor.extract_document(&doc).unwrap();

        assert_eq!(ex.period.to_string(), "abril/2025");
        assert_eq!(ex.balance.anchors.opening_balance, dec("100.00"));
        assert_eq!(ex.balance.anchors.closing_balance, dec("90.00"));
        assert!(ex.balance.is_consistent());
        assert_eq!(ex.transactions.len(), 1);
    }

    #[test]
    fn test_balance_check_threshold_is_inclusive() {
        let anchors = BalanceAnchors {
            opening_date: "01/03".parse().unwrap(),
            opening_balance: dec("100.00"),
            closing_date: "31/03".parse().unwrap(),
            closing_balance: dec("90.05"),
        };
        assert!(BalanceCheck::new(anchors, dec("-10.00"), dec("0.05")).is_consistent());
        assert!(!BalanceCheck::new(anchors, dec("-10.01"), dec("0.05")).is_consistent());
    }

    #[test]
    fn test_missing_period_is_reported() {
        let extractor = StatementExtractor::new(ExtractOptions::default()).unwrap();
        let doc = Document::from_text("x.pdf", "Movimentação\n05/03 PIX 1,00\n");
        assert!(matches!(
            extractor.extract_document(&doc),
            Err(IngestError::PeriodNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_month_name_is_invalid_period() {
        let extractor = StatementExtractor::new(ExtractOptions::default()).unwrap();
        let doc = Document::from_text("x.pdf", "Resumo - Floreal/2025\n");
        assert!(matches!(
            extractor.extract_period(&doc),
            Err(IngestError::InvalidPeriod(_))
        ));
    }
}
