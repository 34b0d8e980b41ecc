//! Table cell arena.
//!
//! A table block owns its paragraphs like any other text-bearing block. Cells
//! do not own anything: each one is an index range into the block's
//! paragraph vector, so grouping cells into rows never copies text.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A table cell, as a contiguous range of its block's paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Index of the first paragraph of the cell
    pub start: usize,
    /// One past the last paragraph of the cell
    pub end: usize,
}

impl TableCell {
    /// Create a cell covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Paragraph index range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of paragraphs in the cell.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the cell has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
