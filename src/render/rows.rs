//! Geometric row reconstruction for table blocks.
//!
//! Neither schema variant reliably wraps a table row in its own element, so
//! rows are rebuilt from cell geometry: cells whose vertical extents overlap
//! by at least half of the shorter one share a row. Grouping works on cell
//! indices into the block's cell arena; no row objects are built.

use crate::model::{Block, BoundingBox, Paragraph};

/// The cells of a table block as paragraph slices.
///
/// A table exported without cell elements treats every paragraph as a cell.
pub fn table_cells(block: &Block) -> Vec<&[Paragraph]> {
    if block.cells().is_empty() {
        block
            .paragraphs()
            .iter()
            .map(std::slice::from_ref)
            .collect()
    } else {
        block
            .cells()
            .iter()
            .map(|cell| block.cell_paragraphs(cell))
            .collect()
    }
}

/// Vertical and horizontal extent of a cell, `None` when it has no lines.
pub fn cell_extent(paragraphs: &[Paragraph]) -> Option<BoundingBox> {
    paragraphs
        .iter()
        .filter_map(Paragraph::extent)
        .reduce(|acc, b| acc.union(&b))
}

/// Group cell extents into rows.
///
/// Returns cell indices per row, rows top to bottom and cells left to right.
/// Cells without an extent are left out.
pub fn group_rows(extents: &[Option<BoundingBox>]) -> Vec<Vec<usize>> {
    let mut cells: Vec<(usize, BoundingBox)> = extents
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.map(|bbox| (i, bbox)))
        .collect();
    cells.sort_by_key(|(i, bbox)| (bbox.top, bbox.left, *i));

    // Each row is anchored on its first (topmost) cell so that one tall cell
    // cannot chain neighbouring rows together.
    let mut rows: Vec<(BoundingBox, Vec<(usize, BoundingBox)>)> = Vec::new();
    for (i, bbox) in cells {
        match rows.iter_mut().find(|(anchor, _)| same_row(anchor, &bbox)) {
            Some((_, members)) => members.push((i, bbox)),
            None => rows.push((bbox, vec![(i, bbox)])),
        }
    }

    log::debug!(
        "Grouped {} table cells into {} rows",
        extents.len(),
        rows.len()
    );

    rows.into_iter()
        .map(|(_, mut members)| {
            members.sort_by_key(|(i, bbox)| (bbox.left, *i));
            members.into_iter().map(|(i, _)| i).collect()
        })
        .collect()
}

/// Reconstructed rows of a table block, each a left-to-right list of cells.
pub fn table_rows(block: &Block) -> Vec<Vec<&[Paragraph]>> {
    let cells = table_cells(block);
    let extents: Vec<Option<BoundingBox>> = cells.iter().map(|c| cell_extent(c)).collect();

    group_rows(&extents)
        .into_iter()
        .map(|row| row.into_iter().map(|i| cells[i]).collect())
        .collect()
}

fn same_row(a: &BoundingBox, b: &BoundingBox) -> bool {
    let overlap = a.vertical_overlap(b);
    overlap > 0 && overlap.saturating_mul(2) >= a.height().min(b.height())
}
