//! The ledger movement produced by statement extraction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, Direction, classify_channel};
use crate::counterparty::extract_counterparty;
use crate::period::{DayMonth, Period};

/// One movement on the account.
///
/// Built through [`Transaction::from_statement_line`], which keeps
/// `direction` in step with the sign of `amount` and leaves `counterparty`
/// empty for anything but PIX.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: DayMonth,
    /// Positive = received, negative = sent. Two decimal places.
    pub amount: Decimal,
    pub channel: Channel,
    pub direction: Direction,
    pub counterparty: String,
    /// The statement line as printed, kept for audit and disambiguation.
    pub raw_description: String,
    /// Set by the orchestrator once the statement period is known.
    pub period: Option<Period>,
    pub source_document: String,
}

impl Transaction {
    /// Derive channel, direction and counterparty from the line content
    /// (the line without its leading date).
    pub fn from_statement_line(
        date: DayMonth,
        amount: Decimal,
        content: &str,
        raw_description: impl Into<String>,
    ) -> Self {
        let amount = amount.round_dp(2);
        let channel = classify_channel(content);
        Self {
            date,
            amount,
            channel,
            direction: Direction::from_amount(amount),
            counterparty: extract_counterparty(content, channel),
            raw_description: raw_description.into(),
            period: None,
            source_document: String::new(),
        }
    }

    /// Attach the statement period and originating document.
    pub fn tagged(mut self, period: Period, source_document: impl Into<String>) -> Self {
        self.period = Some(period);
        self.source_document = source_document.into();
        self
    }

    pub fn is_received(&self) -> bool {
        self.direction == Direction::Received
    }

    /// Full date, taking the year from the statement period.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date.with_year(self.period?.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_pix_line_derives_fields() {
        let t = Transaction::from_statement_line(
            "05/03".parse().unwrap(),
            Decimal::from_str("150.00").unwrap(),
            "PIXRECEBIDOMARIA SILVA 150,00",
            "05/03PIXRECEBIDOMARIA SILVA 150,00",
        );
        assert_eq!(t.channel, Channel::Pix);
        assert!(t.is_received());
        assert_eq!(t.counterparty, "MARIA SILVA");
        assert_eq!(t.period, None);
    }

    #[test]
    fn test_non_pix_has_no_counterparty() {
        let fee = Transaction::from_statement_line(
            "10/03".parse().unwrap(),
            Decimal::from_str("-45.00").unwrap(),
            "TARIFA MENSALIDADE 45,00-",
            "10/03 TARIFA MENSALIDADE 45,00-",
        );
        assert_eq!(fee.channel, Channel::Fee);
        assert_eq!(fee.direction, Direction::Sent);
        assert!(fee.counterparty.is_empty());
    }

    #[test]
    fn test_calendar_date_uses_period_year() {
        let t = Transaction::from_statement_line(
            "31/01".parse().unwrap(),
            Decimal::ONE,
            "REMUNERACAO 1,00",
            "31/01 REMUNERACAO 1,00",
        )
        .tagged(Period::new(2025, 1).unwrap(), "jan.pdf");
        assert_eq!(t.calendar_date(), NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(t.source_document, "jan.pdf");
    }

    #[test]
    fn test_serializes_with_ledger_labels() {
        let t = Transaction::from_statement_line(
            "02/03".parse().unwrap(),
            Decimal::from_str("-12.30").unwrap(),
            "DEBITO VISA 12,30-",
            "02/03 DEBITO VISA 12,30-",
        )
        .tagged("março/2025".parse().unwrap(), "mar.pdf");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["date"], "02/03");
        assert_eq!(json["channel"], "debito");
        assert_eq!(json["direction"], "enviado");
        assert_eq!(json["period"], "março/2025");
    }
}
