//! # abbyyocr
//!
//! Document model and full-text extraction for ABBYY FineReader OCR XML.
//!
//! FineReader exports come in two schema variants (FineReader 6 schema v1 and
//! FineReader 8 schema v2) that share element names but live in different
//! namespaces. This crate parses either variant into one [`Document`] tree of
//! pages, blocks, paragraphs, lines and formatted runs, and flattens that tree
//! into plain text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use abbyyocr::{parse_file, render};
//!
//! fn main() -> abbyyocr::Result<()> {
//!     let doc = parse_file("volume.xml")?;
//!     println!("{} declares {} pages", doc.variant, doc.page_count);
//!
//!     let text = render::to_text(&doc, &render::ExtractOptions::default())?;
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Both schema variants**: one model for FineReader 6 v1 and FineReader 8 v2
//! - **Geometry**: page, block and line boxes in pixel coordinates
//! - **Tables**: cells regrouped into rows from their geometry
//! - **Parallel extraction**: pages are rendered with Rayon
//! - **JSON**: the whole tree serializes with serde

pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod schema;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    Alignment, Block, BlockKind, BoundingBox, Document, FormattedRun, Line, Page, Paragraph,
    ParagraphStyle, StructuralMismatch, TableCell,
};
pub use parser::{AbbyyParser, ErrorMode, ParseOptions};
pub use render::{ExtractOptions, JsonFormat, PageBreak, PageSelection};
pub use schema::{
    detect_variant_from_bytes, frns, is_abbyy_bytes, CompoundQuery, SchemaAdapter, Variant,
};

use std::io::Read;
use std::path::Path;

/// Parse a FineReader export file.
///
/// # Example
///
/// ```no_run
/// use abbyyocr::parse_file;
///
/// let doc = parse_file("volume.xml").unwrap();
/// println!("Pages: {}", doc.pages.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    AbbyyParser::open(path)?.parse()
}

/// Parse a FineReader export file with custom options.
///
/// # Example
///
/// ```no_run
/// use abbyyocr::{parse_file_with_options, ParseOptions};
///
/// let doc = parse_file_with_options("volume.xml", ParseOptions::new().lenient()).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    AbbyyParser::open_with_options(path, options)?.parse()
}

/// Parse a FineReader export from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    AbbyyParser::from_bytes(data)?.parse()
}

/// Parse a FineReader export from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    AbbyyParser::from_bytes_with_options(data, options)?.parse()
}

/// Parse a FineReader export from a reader.
///
/// # Example
///
/// ```no_run
/// use abbyyocr::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("volume.xml").unwrap();
/// let doc = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    AbbyyParser::from_reader(reader)?.parse()
}

/// Parse a FineReader export from a reader with custom options.
pub fn parse_reader_with_options<R: Read>(reader: R, options: ParseOptions) -> Result<Document> {
    AbbyyParser::from_reader_with_options(reader, options)?.parse()
}

/// Extract the full text of a FineReader export file with default options.
///
/// # Example
///
/// ```no_run
/// use abbyyocr::extract_text;
///
/// let text = extract_text("volume.xml").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_text(&doc, &ExtractOptions::default())
}

/// Extract the full text of a FineReader export held in memory.
pub fn extract_text_from_bytes(data: &[u8]) -> Result<String> {
    let doc = parse_bytes(data)?;
    render::to_text(&doc, &ExtractOptions::default())
}

/// Convert a FineReader export file to JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = parse_file(path)?;
    render::to_json(&doc, format)
}

/// Builder for parsing and extracting FineReader exports.
///
/// # Example
///
/// ```no_run
/// use abbyyocr::{AbbyyOcr, PageBreak};
///
/// let text = AbbyyOcr::new()
///     .lenient()
///     .with_page_break(PageBreak::FormFeed)
///     .with_cell_separator("\t")
///     .parse("volume.xml")?
///     .to_text()?;
/// # Ok::<(), abbyyocr::Error>(())
/// ```
pub struct AbbyyOcr {
    parse_options: ParseOptions,
    extract_options: ExtractOptions,
}

impl AbbyyOcr {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            extract_options: ExtractOptions::default(),
        }
    }

    /// Skip malformed nodes instead of failing.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Render pages on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.extract_options = self.extract_options.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.extract_options = self.extract_options.with_pages(pages);
        self
    }

    /// Set the page break style.
    pub fn with_page_break(mut self, page_break: PageBreak) -> Self {
        self.extract_options = self.extract_options.with_page_break(page_break);
        self
    }

    /// Set the table cell separator.
    pub fn with_cell_separator(mut self, separator: impl Into<String>) -> Self {
        self.extract_options = self.extract_options.with_cell_separator(separator);
        self
    }

    /// Parse an export file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<AbbyyOcrResult> {
        let document = AbbyyParser::open_with_options(path, self.parse_options)?.parse()?;
        Ok(AbbyyOcrResult {
            document,
            extract_options: self.extract_options,
        })
    }

    /// Parse an export from bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<AbbyyOcrResult> {
        let document = AbbyyParser::from_bytes_with_options(data, self.parse_options)?.parse()?;
        Ok(AbbyyOcrResult {
            document,
            extract_options: self.extract_options,
        })
    }
}

impl Default for AbbyyOcr {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed export together with the extraction options to apply to it.
pub struct AbbyyOcrResult {
    /// The parsed document
    pub document: Document,
    extract_options: ExtractOptions,
}

impl AbbyyOcrResult {
    /// Extract plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.extract_options)
    }

    /// Iterate over the text of each selected page.
    pub fn page_texts(&self) -> render::PageTexts<'_> {
        render::PageTexts::new(&self.document, &self.extract_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
