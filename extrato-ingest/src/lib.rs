//! extrato-ingest: statement text ingestion and the transaction extraction pipeline.

pub mod document;
pub mod error;
pub mod layout;
pub mod parsers;
pub mod recognizers;
pub mod statement;

pub use document::{Document, Page, list_documents};
pub use error::IngestError;
pub use layout::StatementLayout;
pub use parsers::{BalanceAnchors, BlockLines, BlockState, TransactionParser, read_balance_anchors};
pub use recognizers::Recognizers;
pub use statement::{
    BalanceCheck, BatchExtraction, ExtractOptions, SkippedDocument, StatementExtraction,
    StatementExtractor,
};
