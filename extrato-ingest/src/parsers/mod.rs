//! Statement text parsers: summary anchors, the transaction block, and the
//! line-by-line transaction parser.

pub mod anchors;
pub mod block;
pub mod transactions;

pub use anchors::{BalanceAnchors, read_balance_anchors};
pub use block::{BlockLines, BlockState, block_lines};
pub use transactions::{ParseContext, TransactionParser};
