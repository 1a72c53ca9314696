//! Line-by-line transaction parser for the isolated block.
//!
//! Expected block lines after text extraction:
//!   05/03PIXRECEBIDOMARIA SILVA                150,00
//!         TARIFA MENSALIDADE PACOTE              45,00-
//!   07/03 TRANSFERENCIAPROGRAMADA               300,00-
//!         PARA CONTA 1234-5 AGENCIA 0001       (continuation, never parsed)
//!
//! Undated lines inherit the last date seen in the same document.

use extrato_core::{DayMonth, Transaction, parse_localized_amount};
use tracing::debug;

use crate::layout::StatementLayout;
use crate::recognizers::{Recognizers, has_continuation_marker, leading_day_month};

/// State carried between lines of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    pub current_date: Option<DayMonth>,
    pub skip_next: bool,
}

pub struct TransactionParser<'a> {
    recognizers: &'a Recognizers,
    layout: &'a StatementLayout,
    ctx: ParseContext,
}

impl<'a> TransactionParser<'a> {
    pub fn new(recognizers: &'a Recognizers, layout: &'a StatementLayout) -> Self {
        Self {
            recognizers,
            layout,
            ctx: ParseContext::default(),
        }
    }

    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    /// Parse every line in order; a fresh context per call.
    pub fn parse<'t>(mut self, lines: impl IntoIterator<Item = &'t str>) -> Vec<Transaction> {
        lines.into_iter().filter_map(|line| self.feed(line)).collect()
    }

    /// Process one raw line, returning the transaction it carries, if any.
    pub fn feed(&mut self, raw: &str) -> Option<Transaction> {
        if self.ctx.skip_next {
            self.ctx.skip_next = false;
            return None;
        }

        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        let content = match leading_day_month(line) {
            Some((date, rest)) => {
                self.ctx.current_date = Some(date);
                rest
            }
            None => line,
        };

        // nothing before the first dated entry is a transaction
        let date = self.ctx.current_date?;

        let token = self.recognizers.find_amount(content)?;
        let amount = match parse_localized_amount(token) {
            Ok(a) => a,
            Err(e) => {
                debug!(line, error = %e, "amount token not normalized");
                return None;
            }
        };

        if has_continuation_marker(line, &self.layout.continuation_markers) {
            self.ctx.skip_next = true;
        }

        Some(Transaction::from_statement_line(date, amount, content, raw))
    }
}
