//! FineReader XML parser using roxmltree.

use std::io::Read;
use std::path::Path;

use roxmltree::{Node, ParsingOptions};

use crate::error::{Error, Result};
use crate::model::{
    Alignment, Block, BlockKind, BoundingBox, Document, FormattedRun, Line, Page, Paragraph,
    ParagraphStyle,
};
use crate::schema::{frns, CompoundQuery, SchemaAdapter};

use super::encoding::decode_source;
use super::options::ParseOptions;

/// FineReader export parser.
///
/// Holds the decoded source text; [`AbbyyParser::parse`] builds a fresh,
/// fully owned [`Document`] on every call.
pub struct AbbyyParser {
    source: String,
    options: ParseOptions,
}

impl AbbyyParser {
    /// Open an export file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open an export file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Load an export from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Load an export from bytes with custom options.
    ///
    /// The bytes are decoded according to their BOM or XML declaration.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        Ok(Self {
            source: decode_source(data)?,
            options,
        })
    }

    /// Load an export from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Load an export from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse the export and return a structured Document.
    pub fn parse(&self) -> Result<Document> {
        let parsing = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let xml = roxmltree::Document::parse_with_options(&self.source, parsing)?;
        let root = xml.root_element();
        let schema = SchemaAdapter::for_root(root)?;

        TreeBuilder::new(schema, &self.options).build(root)
    }
}

/// Schema-agnostic paths used while building the tree.
struct Queries {
    page: CompoundQuery,
    block: CompoundQuery,
    text_par: CompoundQuery,
    cell: CompoundQuery,
    nested_par: CompoundQuery,
    line: CompoundQuery,
    // formatting sits at different depths under a line depending on the variant
    run: CompoundQuery,
    char_params: CompoundQuery,
    rect: CompoundQuery,
}

impl Queries {
    fn new() -> Self {
        Self {
            page: frns("page"),
            block: frns("block"),
            text_par: frns("text/par"),
            cell: frns("//cell"),
            nested_par: frns("//par"),
            line: frns("line"),
            run: frns("//formatting"),
            char_params: frns("charParams"),
            rect: frns("region/rect"),
        }
    }
}

struct TreeBuilder<'o> {
    schema: SchemaAdapter,
    options: &'o ParseOptions,
    queries: Queries,
}

impl<'o> TreeBuilder<'o> {
    fn new(schema: SchemaAdapter, options: &'o ParseOptions) -> Self {
        Self {
            schema,
            options,
            queries: Queries::new(),
        }
    }

    fn build(&self, root: Node<'_, '_>) -> Result<Document> {
        let mut pages = Vec::new();
        for (i, node) in self
            .schema
            .select(root, &self.queries.page)
            .into_iter()
            .enumerate()
        {
            if let Some(page) = self.recover(self.build_page(node, i as u32 + 1))? {
                pages.push(page);
            }
        }

        let declared = self
            .recover(attr_u32(root, "pagesCount", "document"))?
            .unwrap_or(pages.len() as u32);

        let mut document = Document::new(self.schema.variant(), declared);
        document.language = attr_string(root, "mainLanguage");
        document.languages = attr_string(root, "languages");
        document.producer = attr_string(root, "producer");
        document.version = attr_string(root, "version");
        document.pages = pages;

        if let Some(mismatch) = document.structural_mismatch() {
            log::warn!("Page count mismatch: {}", mismatch);
        }
        log::debug!(
            "Parsed {} document with {} pages and {} blocks",
            document.variant,
            document.parsed_page_count(),
            document.block_count()
        );

        Ok(document)
    }

    /// Apply the error mode to a node-scoped result.
    fn recover<T>(&self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if self.options.is_lenient() && e.is_node_scoped() => {
                log::warn!("Skipping malformed node: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn build_page(&self, node: Node<'_, '_>, number: u32) -> Result<Page> {
        let path = format!("page[{}]", number);
        let mut page = Page::new(
            number,
            positive_u32(node, "width", &path)?,
            positive_u32(node, "height", &path)?,
            positive_u32(node, "resolution", &path)?,
        );

        for (i, block_node) in self
            .schema
            .select(node, &self.queries.block)
            .into_iter()
            .enumerate()
        {
            let block_path = format!("{}/block[{}]", path, i + 1);
            if let Some(block) = self.recover(self.build_block(block_node, &block_path))? {
                page.add_block(block);
            }
        }

        Ok(page)
    }

    fn build_block(&self, node: Node<'_, '_>, path: &str) -> Result<Block> {
        let kind = BlockKind::from(node.attribute("blockType").unwrap_or("Unknown"));
        let mut block = Block::new(kind, self.block_bbox(node, path)?);

        match block.kind {
            BlockKind::Text => {
                let nodes = self.schema.select(node, &self.queries.text_par);
                block.paragraphs = self.build_paragraphs(nodes, path)?;
            }
            BlockKind::Table => {
                let cells = self.schema.select(node, &self.queries.cell);
                if cells.is_empty() {
                    let nodes = self.schema.select(node, &self.queries.nested_par);
                    block.paragraphs = self.build_paragraphs(nodes, path)?;
                }
                for (i, cell) in cells.into_iter().enumerate() {
                    let cell_path = format!("{}/cell[{}]", path, i + 1);
                    let nodes = self.schema.select(cell, &self.queries.nested_par);
                    block.add_cell(self.build_paragraphs(nodes, &cell_path)?);
                }
            }
            _ => {}
        }

        Ok(block)
    }

    /// Block boxes come from `l`/`t`/`r`/`b`, or from the region rectangles
    /// when the block carries no box attributes.
    fn block_bbox(&self, node: Node<'_, '_>, path: &str) -> Result<BoundingBox> {
        let has_box = ["l", "t", "r", "b"]
            .iter()
            .any(|name| node.attribute(*name).is_some());
        if has_box {
            return read_bbox(node, path);
        }

        let mut bbox: Option<BoundingBox> = None;
        for (i, rect) in self
            .schema
            .select(node, &self.queries.rect)
            .into_iter()
            .enumerate()
        {
            let rect_bbox = read_bbox(rect, &format!("{}/region/rect[{}]", path, i + 1))?;
            bbox = Some(bbox.map_or(rect_bbox, |b| b.union(&rect_bbox)));
        }
        bbox.ok_or_else(|| Error::malformed(path, "l", None))
    }

    fn build_paragraphs(&self, nodes: Vec<Node<'_, '_>>, path: &str) -> Result<Vec<Paragraph>> {
        let mut paragraphs = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.into_iter().enumerate() {
            let par_path = format!("{}/par[{}]", path, i + 1);
            if let Some(paragraph) = self.recover(self.build_paragraph(node, &par_path))? {
                paragraphs.push(paragraph);
            }
        }
        Ok(paragraphs)
    }

    fn build_paragraph(&self, node: Node<'_, '_>, path: &str) -> Result<Paragraph> {
        let mut paragraph = Paragraph::new();
        paragraph.style = ParagraphStyle {
            alignment: node.attribute("align").and_then(Alignment::parse),
            left_indent: attr_i32(node, "leftIndent"),
            right_indent: attr_i32(node, "rightIndent"),
            start_indent: attr_i32(node, "startIndent"),
            line_spacing: attr_i32(node, "lineSpacing"),
        };

        for (i, line_node) in self
            .schema
            .select(node, &self.queries.line)
            .into_iter()
            .enumerate()
        {
            let line_path = format!("{}/line[{}]", path, i + 1);
            if let Some(line) = self.recover(self.build_line(line_node, &line_path))? {
                paragraph.add_line(line);
            }
        }

        Ok(paragraph)
    }

    fn build_line(&self, node: Node<'_, '_>, path: &str) -> Result<Line> {
        let mut line = Line::new(attr_u32(node, "baseline", path)?, read_bbox(node, path)?);
        for run_node in self.schema.select(node, &self.queries.run) {
            line.add_run(self.build_run(run_node));
        }
        Ok(line)
    }

    fn build_run(&self, node: Node<'_, '_>) -> FormattedRun {
        let chars = self.schema.select(node, &self.queries.char_params);
        let text = if chars.is_empty() {
            text_content(node)
        } else {
            chars.into_iter().map(text_content).collect()
        };

        FormattedRun {
            language: attr_string(node, "lang"),
            text,
            font_family: attr_string(node, "ff"),
            font_size: node.attribute("fs").and_then(|v| v.trim().parse().ok()),
            bold: attr_flag(node, "bold"),
            italic: attr_flag(node, "italic"),
        }
    }
}

/// Concatenated text of all descendant text nodes.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

fn attr_string(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn attr_flag(node: Node<'_, '_>, name: &str) -> bool {
    matches!(node.attribute(name), Some("true") | Some("1"))
}

/// Optional layout integers; unparsable values are treated as absent.
fn attr_i32(node: Node<'_, '_>, name: &str) -> Option<i32> {
    node.attribute(name).and_then(|v| v.trim().parse().ok())
}

fn attr_u32(node: Node<'_, '_>, name: &str, path: &str) -> Result<u32> {
    let raw = node
        .attribute(name)
        .ok_or_else(|| Error::malformed(path, name, None))?;
    raw.trim()
        .parse()
        .map_err(|_| Error::malformed(path, name, Some(raw)))
}

fn positive_u32(node: Node<'_, '_>, name: &str, path: &str) -> Result<u32> {
    match attr_u32(node, name, path)? {
        0 => Err(Error::malformed(path, name, Some("0"))),
        value => Ok(value),
    }
}

fn read_bbox(node: Node<'_, '_>, path: &str) -> Result<BoundingBox> {
    let bbox = BoundingBox::new(
        attr_u32(node, "l", path)?,
        attr_u32(node, "t", path)?,
        attr_u32(node, "r", path)?,
        attr_u32(node, "b", path)?,
    );
    if !bbox.is_valid() {
        let value = format!("{},{},{},{}", bbox.left, bbox.top, bbox.right, bbox.bottom);
        return Err(Error::malformed(path, "bbox", Some(&value)));
    }
    Ok(bbox)
}
