use std::path::PathBuf;

use extrato_core::FormatError;
use thiserror::Error;

/// Failures that make a single document unusable. The batch skips the
/// document and carries on.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot extract text from {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },

    #[error("unsupported document type: {}", .0.display())]
    UnsupportedDocument(PathBuf),

    #[error("statement period ('{marker} - mês/ano') not found")]
    PeriodNotFound { marker: String },

    #[error("unreadable statement period: {0}")]
    InvalidPeriod(#[from] FormatError),

    #[error("expected two balance anchors, found {found}")]
    AnchorNotFound { found: usize },

    #[error("invalid layout pattern: {0}")]
    Pattern(#[from] regex::Error),
}
