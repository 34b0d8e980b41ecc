//! Extraction options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Default text placed between the cells of a flattened table row.
pub const DEFAULT_CELL_SEPARATOR: &str = "  ";

/// Options for full-text extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Which pages to extract
    pub page_selection: PageSelection,

    /// How consecutive pages are separated
    pub page_break: PageBreak,

    /// Text between the cells of one table row
    pub cell_separator: String,

    /// Render pages in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.page_selection = selection;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.page_selection = PageSelection::Range(range);
        self
    }

    /// Set the page break style.
    pub fn with_page_break(mut self, page_break: PageBreak) -> Self {
        self.page_break = page_break;
        self
    }

    /// Set the table cell separator. Empty separators fall back to the default.
    pub fn with_cell_separator(mut self, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        self.cell_separator = if separator.is_empty() {
            DEFAULT_CELL_SEPARATOR.to_string()
        } else {
            separator
        };
        self
    }

    /// Enable or disable parallel page rendering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            page_selection: PageSelection::All,
            page_break: PageBreak::BlankLine,
            cell_separator: DEFAULT_CELL_SEPARATOR.to_string(),
            parallel: true,
        }
    }
}

/// How pages are separated in extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageBreak {
    /// One blank line between pages; pages without text are skipped
    #[default]
    BlankLine,
    /// A form feed (`\x0c`) between every selected page, empty or not
    FormFeed,
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default)]
pub enum PageSelection {
    /// Extract all pages
    #[default]
    All,
    /// Extract a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Extract specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p = parse_page_number(part)?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }

        pages.sort();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page_number(s: &str) -> Result<u32> {
    s.trim()
        .parse()
        .map_err(|_| Error::InvalidPageRange(format!("invalid page number {:?}", s.trim())))
}
