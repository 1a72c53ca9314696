//! extrato-core: ledger types, localized money parsing and line classification
//! shared by the statement extractor and the reconciler.

pub mod channel;
pub mod counterparty;
pub mod error;
pub mod money;
pub mod period;
pub mod transaction;

pub use channel::{Channel, Direction, classify_channel};
pub use counterparty::extract_counterparty;
pub use error::FormatError;
pub use money::{format_amount, parse_localized_amount};
pub use period::{DayMonth, Period, missing_periods};
pub use transaction::Transaction;
