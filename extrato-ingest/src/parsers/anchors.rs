//! Running-balance anchors printed in the statement summary.
//!
//! Expected word tokens after text extraction:
//!   SaldodeContaCorrenteem01/03   1.000,00
//!   SaldodeContaCorrenteem31/03   800,00

use extrato_core::{DayMonth, parse_localized_amount};
use rust_decimal::Decimal;
use tracing::debug;

use crate::document::Document;
use crate::error::IngestError;
use crate::recognizers::{anchor_date, is_numeric_token};

/// Opening and closing balances; only used to sanity-check extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceAnchors {
    pub opening_date: DayMonth,
    pub opening_balance: Decimal,
    pub closing_date: DayMonth,
    pub closing_balance: Decimal,
}

/// Collect the first two `<label>dd/mm` words directly followed by a
/// numeric word, page by page, stopping as soon as two are found.
pub fn read_balance_anchors(doc: &Document, label: &str) -> Result<BalanceAnchors, IngestError> {
    let mut found: Vec<(DayMonth, Decimal)> = Vec::with_capacity(2);

    'pages: for page in &doc.pages {
        let words: Vec<&str> = page.words().collect();
        for pair in words.windows(2) {
            let Some(date) = anchor_date(pair[0], label) else {
                continue;
            };
            if !is_numeric_token(pair[1]) {
                continue;
            }
            match parse_localized_amount(pair[1]) {
                Ok(balance) => found.push((date, balance)),
                Err(e) => {
                    debug!(document = %doc.name, word = pair[1], error = %e, "anchor balance skipped");
                    continue;
                }
            }
            if found.len() == 2 {
                break 'pages;
            }
        }
    }

    match found.as_slice() {
        [(opening_date, opening_balance), (closing_date, closing_balance), ..] => {
            Ok(BalanceAnchors {
                opening_date: *opening_date,
                opening_balance: *opening_balance,
                closing_date: *closing_date,
                closing_balance: *closing_balance,
            })
        }
        _ => Err(IngestError::AnchorNotFound { found: found.len() }),
    }
}
