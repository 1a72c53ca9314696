//! Isolates the transaction listing ("Movimentação") of a statement.
//!
//! ```text
//! BEFORE_BLOCK --header--> IN_BLOCK --trailer--> DONE
//!                            |  balance rows dropped
//!                            |  everything else yielded verbatim
//! ```

use crate::document::Document;
use crate::layout::StatementLayout;
use crate::recognizers::{is_balance_row, is_block_header, is_block_trailer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    BeforeBlock,
    InBlock,
    Done,
}

/// Lazy iterator over the raw lines of the transaction block.
///
/// The header line is consumed, never yielded. Once the trailer is seen the
/// iterator is finished for good, even if more lines follow.
pub struct BlockLines<'l, I> {
    lines: I,
    layout: &'l StatementLayout,
    state: BlockState,
}

impl<'l, I> BlockLines<'l, I> {
    pub fn new(lines: I, layout: &'l StatementLayout) -> Self {
        Self {
            lines,
            layout,
            state: BlockState::BeforeBlock,
        }
    }

    pub fn state(&self) -> BlockState {
        self.state
    }
}

impl<'l, 't, I> Iterator for BlockLines<'l, I>
where
    I: Iterator<Item = &'t str>,
{
    type Item = &'t str;

    fn next(&mut self) -> Option<&'t str> {
        loop {
            if self.state == BlockState::Done {
                return None;
            }
            let line = self.lines.next()?;
            let stripped = line.trim();

            match self.state {
                BlockState::BeforeBlock => {
                    if is_block_header(stripped, &self.layout.header_keyword) {
                        self.state = BlockState::InBlock;
                    }
                }
                BlockState::InBlock => {
                    if is_block_trailer(stripped, &self.layout.trailer_marker) {
                        self.state = BlockState::Done;
                        return None;
                    }
                    if is_balance_row(stripped, &self.layout.balance_row_prefixes) {
                        continue;
                    }
                    return Some(line);
                }
                BlockState::Done => return None,
            }
        }
    }
}

/// Block lines of a whole document, across page boundaries.
pub fn block_lines<'a>(
    doc: &'a Document,
    layout: &'a StatementLayout,
) -> BlockLines<'a, impl Iterator<Item = &'a str>> {
    BlockLines::new(doc.lines(), layout)
}
