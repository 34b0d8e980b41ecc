//! JSON rendering for OCR documents.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockKind, BoundingBox, Page};
    use crate::schema::Variant;

    fn sample() -> Document {
        let mut doc = Document::new(Variant::FineReader6V1, 1);
        doc.language = Some("EnglishUnitedStates".to_string());
        let mut page = Page::new(1, 1500, 2174, 300);
        page.add_block(Block::new(
            BlockKind::Picture,
            BoundingBox::new(144, 62, 1358, 2114),
        ));
        doc.add_page(page);
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"variant\": \"fr6v1\""));
        assert!(json.contains("\"type\": \"Picture\""));
        assert!(json.contains("\"left\": 144"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact_round_trip() {
        let doc = sample();
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
