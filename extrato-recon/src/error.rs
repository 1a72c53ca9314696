use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column '{0}'")]
    MissingColumn(String),
}

pub type Result<T> = std::result::Result<T, ReconError>;
