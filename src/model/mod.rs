//! Document model types for FineReader OCR content.
//!
//! The model is variant-agnostic: whichever schema variant a document was
//! exported with, it is represented as the same strict ownership tree
//! Document → Page → Block → Paragraph → Line → FormattedRun. Derived views
//! (text blocks, page paragraphs, line text) are computed on access.

mod document;
mod geometry;
mod page;
mod paragraph;
mod table;

pub use document::{Document, StructuralMismatch};
pub use geometry::BoundingBox;
pub use page::{Block, BlockKind, Page};
pub use paragraph::{Alignment, FormattedRun, Line, Paragraph, ParagraphStyle};
pub use table::TableCell;
