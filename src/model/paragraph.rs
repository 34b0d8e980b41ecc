//! Paragraph, line and run types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A paragraph of recognized text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Lines in reading order
    pub lines: Vec<Line>,

    /// Alignment metadata
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph from lines.
    pub fn with_lines(lines: Vec<Line>) -> Self {
        Self {
            lines,
            style: ParagraphStyle::default(),
        }
    }

    /// Add a line to the paragraph.
    pub fn add_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Check if the paragraph has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Raw text of every line, one per output line.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Union of the bounding boxes of all lines, `None` for an empty paragraph.
    pub fn extent(&self) -> Option<BoundingBox> {
        self.lines
            .iter()
            .map(|l| l.bbox)
            .reduce(|acc, b| acc.union(&b))
    }
}

/// Paragraph alignment metadata.
///
/// Carried through from the export but never used for text extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Text alignment
    pub alignment: Option<Alignment>,
    /// Left indent in pixels
    pub left_indent: Option<i32>,
    /// Right indent in pixels
    pub right_indent: Option<i32>,
    /// First line indent in pixels (may be negative)
    pub start_indent: Option<i32>,
    /// Line spacing as exported
    pub line_spacing: Option<i32>,
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
    /// Justified
    Justified,
}

impl Alignment {
    /// Parse an `align` attribute value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Left" => Some(Alignment::Left),
            "Center" => Some(Alignment::Center),
            "Right" => Some(Alignment::Right),
            "Justified" => Some(Alignment::Justified),
            _ => None,
        }
    }
}

/// A single recognized line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Baseline y coordinate
    pub baseline: u32,

    /// Line bounding box
    #[serde(flatten)]
    pub bbox: BoundingBox,

    /// Formatted runs in order
    pub runs: Vec<FormattedRun>,
}

impl Line {
    /// Create a line without runs.
    pub fn new(baseline: u32, bbox: BoundingBox) -> Self {
        Self {
            baseline,
            bbox,
            runs: Vec::new(),
        }
    }

    /// Add a run to the line.
    pub fn add_run(&mut self, run: FormattedRun) {
        self.runs.push(run);
    }

    /// The line text exactly as encoded: run texts concatenated in order.
    ///
    /// No whitespace is collapsed, so OCR artifacts such as doubled spaces
    /// survive.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// The line text with whitespace runs collapsed to one space and trimmed.
    pub fn normalized_text(&self) -> String {
        self.text().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Check if the line has no text at all.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(FormattedRun::is_empty)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized_text())
    }
}

/// A contiguous text segment with uniform language and formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedRun {
    /// Recognition language (e.g. `EnglishUnitedStates`)
    pub language: Option<String>,

    /// Raw text segment
    pub text: String,

    /// Font family
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Font size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,
}

impl FormattedRun {
    /// Create a run with text and language.
    pub fn new(text: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            language: language.map(str::to_string),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
