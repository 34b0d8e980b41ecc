//! Page and block types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BoundingBox, Line, Paragraph, TableCell};

/// A single scanned page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed, position in the export)
    pub number: u32,

    /// Page width in pixels
    pub width: u32,

    /// Page height in pixels
    pub height: u32,

    /// Scan resolution in dots per inch
    pub resolution: u32,

    /// Blocks in document order
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create a new page with the given geometry.
    pub fn new(number: u32, width: u32, height: u32, resolution: u32) -> Self {
        Self {
            number,
            width,
            height,
            resolution,
            blocks: Vec::new(),
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Blocks of one kind, in document order.
    pub fn blocks_of_type(&self, kind: &BlockKind) -> Vec<&Block> {
        self.blocks.iter().filter(|b| &b.kind == kind).collect()
    }

    /// Text blocks, in document order.
    pub fn text_blocks(&self) -> Vec<&Block> {
        self.blocks_of_type(&BlockKind::Text)
    }

    /// Picture blocks, in document order.
    pub fn picture_blocks(&self) -> Vec<&Block> {
        self.blocks_of_type(&BlockKind::Picture)
    }

    /// Table blocks, in document order.
    pub fn table_blocks(&self) -> Vec<&Block> {
        self.blocks_of_type(&BlockKind::Table)
    }

    /// Paragraphs of every text and table block, in block order.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        self.blocks
            .iter()
            .filter(|b| b.is_text_bearing())
            .flat_map(|b| b.paragraphs.iter())
            .collect()
    }

    /// All lines on the page, in document order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.paragraphs().into_iter().flat_map(|p| p.lines.iter())
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Block classification from the export's `blockType` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    /// Running text
    Text,
    /// Table, with text organized in cells
    Table,
    /// Image region
    Picture,
    /// Barcode region
    Barcode,
    /// Separator line
    Separator,
    /// Box drawn from separators
    SeparatorsBox,
    /// Check mark
    Checkmark,
    /// Group of check marks
    GroupCheckmark,
    /// Any other block type, kept verbatim
    Other(String),
}

impl BlockKind {
    /// The attribute value for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Text => "Text",
            BlockKind::Table => "Table",
            BlockKind::Picture => "Picture",
            BlockKind::Barcode => "Barcode",
            BlockKind::Separator => "Separator",
            BlockKind::SeparatorsBox => "SeparatorsBox",
            BlockKind::Checkmark => "Checkmark",
            BlockKind::GroupCheckmark => "GroupCheckmark",
            BlockKind::Other(name) => name,
        }
    }
}

impl From<&str> for BlockKind {
    fn from(value: &str) -> Self {
        match value {
            "Text" => BlockKind::Text,
            "Table" => BlockKind::Table,
            "Picture" => BlockKind::Picture,
            "Barcode" => BlockKind::Barcode,
            "Separator" => BlockKind::Separator,
            "SeparatorsBox" => BlockKind::SeparatorsBox,
            "Checkmark" => BlockKind::Checkmark,
            "GroupCheckmark" => BlockKind::GroupCheckmark,
            other => BlockKind::Other(other.to_string()),
        }
    }
}

impl From<String> for BlockKind {
    fn from(value: String) -> Self {
        BlockKind::from(value.as_str())
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified page region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block type
    #[serde(rename = "type")]
    pub kind: BlockKind,

    /// Region bounding box
    #[serde(flatten)]
    pub bbox: BoundingBox,

    /// Paragraphs (text and table blocks only)
    pub paragraphs: Vec<Paragraph>,

    /// Cells of a table block, indexing into `paragraphs`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<TableCell>,
}

impl Block {
    /// Create an empty block.
    pub fn new(kind: BlockKind, bbox: BoundingBox) -> Self {
        Self {
            kind,
            bbox,
            paragraphs: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Add a paragraph outside of any cell.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Add a table cell made of the given paragraphs.
    pub fn add_cell(&mut self, paragraphs: Vec<Paragraph>) {
        let start = self.paragraphs.len();
        self.paragraphs.extend(paragraphs);
        self.cells.push(TableCell::new(start, self.paragraphs.len()));
    }

    /// Paragraphs of this block (empty for non-text blocks).
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Table cells of this block (empty unless the export marked cells).
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    /// Paragraphs of one cell.
    pub fn cell_paragraphs(&self, cell: &TableCell) -> &[Paragraph] {
        self.paragraphs.get(cell.range()).unwrap_or(&[])
    }

    /// Check if this block can carry paragraphs.
    pub fn is_text_bearing(&self) -> bool {
        matches!(self.kind, BlockKind::Text | BlockKind::Table)
    }
}
