//! Rendering module: full-text extraction and JSON export.

mod json;
mod options;
pub mod rows;
mod text;

pub use json::{to_json, JsonFormat};
pub use options::{ExtractOptions, PageBreak, PageSelection, DEFAULT_CELL_SEPARATOR};
pub use text::{extract_page_text, join_pages, to_text, PageText, PageTexts};
