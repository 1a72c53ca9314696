use thiserror::Error;

/// A token that cannot be normalized into a typed value.
///
/// Always recoverable: callers drop the offending line or row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no amount in {0:?}")]
    NoAmount(String),

    #[error("invalid day/month {0:?}")]
    InvalidDayMonth(String),

    #[error("invalid period {0:?}")]
    InvalidPeriod(String),

    #[error("unknown {kind} {value:?}")]
    UnknownLabel { kind: &'static str, value: String },
}
