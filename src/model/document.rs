//! Document-level types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Page;
use crate::schema::Variant;

/// A parsed FineReader OCR export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Schema variant the export was written in
    pub variant: Variant,

    /// Page count declared by the export (`pagesCount`)
    pub page_count: u32,

    /// Primary recognition language (`mainLanguage`)
    pub language: Option<String>,

    /// Recognition languages (`languages`), kept independent of `language`
    pub languages: Option<String>,

    /// Producing application, when declared
    pub producer: Option<String>,

    /// Export format version, when declared
    pub version: Option<String>,

    /// Pages in document order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(variant: Variant, page_count: u32) -> Self {
        Self {
            variant,
            page_count,
            language: None,
            languages: None,
            producer: None,
            version: None,
            pages: Vec::new(),
        }
    }

    /// Number of pages actually present in the export.
    pub fn parsed_page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Report a disagreement between the declared and parsed page counts.
    ///
    /// The document is never repaired; callers decide whether a truncated
    /// export is acceptable.
    pub fn structural_mismatch(&self) -> Option<StructuralMismatch> {
        let parsed = self.parsed_page_count();
        (parsed != self.page_count).then_some(StructuralMismatch {
            declared: self.page_count,
            parsed,
        })
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of blocks across all pages.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(Page::block_count).sum()
    }
}

/// Declared and parsed page counts that disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralMismatch {
    /// Page count declared by the export
    pub declared: u32,
    /// Number of page elements found
    pub parsed: u32,
}

impl fmt::Display for StructuralMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "document declares {} pages but contains {}",
            self.declared, self.parsed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new(Variant::FineReader8V2, 0);
        assert!(doc.is_empty());
        assert_eq!(doc.parsed_page_count(), 0);
        assert_eq!(doc.structural_mismatch(), None);
    }

    #[test]
    fn test_get_page_is_one_indexed() {
        let mut doc = Document::new(Variant::FineReader6V1, 2);
        doc.add_page(Page::new(1, 1500, 2174, 300));
        doc.add_page(Page::new(2, 1500, 2174, 300));

        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2).map(|p| p.number), Some(2));
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_structural_mismatch_is_reported_not_repaired() {
        let mut doc = Document::new(Variant::FineReader6V1, 132);
        doc.add_page(Page::new(1, 1500, 2174, 300));

        let mismatch = doc.structural_mismatch().unwrap();
        assert_eq!(mismatch.declared, 132);
        assert_eq!(mismatch.parsed, 1);
        assert_eq!(doc.page_count, 132);
        assert_eq!(
            mismatch.to_string(),
            "document declares 132 pages but contains 1"
        );
    }

    #[test]
    fn test_document_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Document>();
        assert_send_sync::<Page>();
    }

    #[test]
    fn test_languages_are_independent() {
        let mut doc = Document::new(Variant::FineReader8V2, 0);
        doc.language = Some("EnglishUnitedStates".to_string());
        doc.languages = Some("EnglishUnitedStates,French".to_string());
        assert_ne!(doc.language, doc.languages);
    }
}
