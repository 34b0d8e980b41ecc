//! Plain text extraction for OCR documents.
//!
//! Text blocks emit one output line per OCR line with a blank line between
//! paragraphs. Table blocks emit one output line per geometric row. Pictures,
//! separators and unclassified blocks emit nothing. Line text is used exactly
//! as encoded; no whitespace is collapsed.

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{Block, BlockKind, Document, Line, Page, Paragraph};

use super::rows::table_rows;
use super::{ExtractOptions, PageBreak};

/// Form feed used by [`PageBreak::FormFeed`].
const FORM_FEED: &str = "\x0c";

/// Convert a document to plain text.
///
/// Re-running extraction over the same document with the same options
/// yields byte-identical output, parallel or not.
///
/// Text rendering itself cannot fail today; the `Result` keeps the signature
/// in line with [`to_json`](super::to_json) so callers handle every renderer
/// the same way.
pub fn to_text(doc: &Document, options: &ExtractOptions) -> Result<String> {
    let selected: Vec<&Page> = doc
        .pages
        .iter()
        .filter(|p| options.page_selection.includes(p.number))
        .collect();

    log::debug!(
        "Extracting text from {} of {} pages",
        selected.len(),
        doc.pages.len()
    );

    let texts: Vec<String> = if options.parallel {
        selected
            .par_iter()
            .map(|page| extract_page_text(page, options))
            .collect()
    } else {
        selected
            .iter()
            .map(|page| extract_page_text(page, options))
            .collect()
    };

    Ok(join_pages(texts, options.page_break))
}

/// Plain text of a single page.
pub fn extract_page_text(page: &Page, options: &ExtractOptions) -> String {
    let mut chunks = Vec::new();
    for block in &page.blocks {
        push_block_chunks(block, options, &mut chunks);
    }
    chunks.join("\n")
}

/// Join per-page texts according to the page break style.
pub fn join_pages(texts: Vec<String>, page_break: PageBreak) -> String {
    match page_break {
        PageBreak::BlankLine => texts
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        PageBreak::FormFeed => texts.join(FORM_FEED),
    }
}

fn push_block_chunks(block: &Block, options: &ExtractOptions, chunks: &mut Vec<String>) {
    match block.kind {
        BlockKind::Text => chunks.extend(block.paragraphs().iter().filter_map(paragraph_chunk)),
        BlockKind::Table => chunks.extend(table_chunk(block, &options.cell_separator)),
        _ => {}
    }
}

fn paragraph_chunk(paragraph: &Paragraph) -> Option<String> {
    if paragraph.is_empty() {
        return None;
    }

    let mut out = String::new();
    for line in &paragraph.lines {
        out.push_str(&line.text());
        out.push('\n');
    }
    Some(out)
}

fn table_chunk(block: &Block, separator: &str) -> Option<String> {
    let mut out = String::new();
    for row in table_rows(block) {
        let cells: Vec<String> = row
            .into_iter()
            .map(cell_text)
            .filter(|t| !t.is_empty())
            .collect();
        if cells.is_empty() {
            continue;
        }
        out.push_str(&cells.join(separator));
        out.push('\n');
    }
    (!out.is_empty()).then_some(out)
}

/// All lines of a cell on one line, separated by single spaces.
fn cell_text(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .flat_map(|p| p.lines.iter())
        .map(Line::text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lazy per-page text, for callers that stream pages instead of building
/// one string.
pub struct PageTexts<'a> {
    pages: std::slice::Iter<'a, Page>,
    options: &'a ExtractOptions,
}

impl<'a> PageTexts<'a> {
    /// Iterate over the selected pages of a document.
    pub fn new(doc: &'a Document, options: &'a ExtractOptions) -> Self {
        Self {
            pages: doc.pages.iter(),
            options,
        }
    }
}

/// Text of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-indexed page number
    pub number: u32,
    /// Extracted text (empty for pages without text)
    pub text: String,
}

impl Iterator for PageTexts<'_> {
    type Item = PageText;

    fn next(&mut self) -> Option<Self::Item> {
        let options = self.options;
        self.pages
            .by_ref()
            .find(|p| options.page_selection.includes(p.number))
            .map(|page| PageText {
                number: page.number,
                text: extract_page_text(page, options),
            })
    }
}
