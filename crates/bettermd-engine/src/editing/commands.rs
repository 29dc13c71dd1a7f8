use thiserror::Error;

use crate::models::{Block, BlockKind, Document, InlineLeaf, Mark, Selection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Block {block} is out of range (document has {len} blocks)")]
    BlockOutOfRange { block: usize, len: usize },
    #[error("Offset {offset} is past the end of block {block} (length {len})")]
    OffsetOutOfRange {
        block: usize,
        offset: usize,
        len: usize,
    },
    #[error("Offset {offset} in block {block} is not on a character boundary")]
    NotCharBoundary { block: usize, offset: usize },
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Whether any leaf intersecting the selection carries `mark`.
pub fn is_mark_active(doc: &Document, sel: &Selection, mark: Mark) -> Result<bool, CommandError> {
    validate_selection(doc, sel)?;
    Ok(selected_ranges(doc, *sel).any(|(index, lo, hi)| {
        leaf_spans(&doc.blocks()[index])
            .any(|(start, leaf)| intersects(start, leaf, lo, hi) && leaf.marks.get(mark))
    }))
}

/// Whether any block touched by the selection has kind `kind`.
pub fn is_block_active(
    doc: &Document,
    sel: &Selection,
    kind: BlockKind,
) -> Result<bool, CommandError> {
    validate_selection(doc, sel)?;
    let blocks = &doc.blocks()[sel.start().block..=sel.end().block];
    Ok(blocks.iter().any(|b| b.kind == kind))
}

/// Toggle `mark` on the selected text.
///
/// If any selected leaf already has the mark it is cleared everywhere in the
/// selection, otherwise it is set everywhere. Leaves are split at the selection
/// edges and adjacent leaves with equal marks are merged afterwards. A collapsed
/// selection covers no text and leaves the document as it is.
pub fn toggle_format(doc: &Document, sel: &Selection, mark: Mark) -> Result<Document, CommandError> {
    let active = is_mark_active(doc, sel, mark)?;
    let mut out = doc.clone();
    if sel.is_collapsed() {
        return Ok(out);
    }

    let ranges: Vec<_> = selected_ranges(doc, *sel).collect();
    let blocks = out.blocks_mut();
    for (index, lo, hi) in ranges {
        let block = &mut blocks[index];
        block.children = split_and_mark(&block.children, lo, hi, mark, !active);
        normalize_leaves(&mut block.children);
    }

    Ok(out)
}

/// Toggle the kind of every block touched by the selection.
///
/// If any of them already has `kind` they all become [`BlockKind::Paragraph`],
/// otherwise they all become `kind`.
pub fn toggle_block(
    doc: &Document,
    sel: &Selection,
    kind: BlockKind,
) -> Result<Document, CommandError> {
    let active = is_block_active(doc, sel, kind)?;
    let target = if active { BlockKind::Paragraph } else { kind };

    let mut out = doc.clone();
    for block in &mut out.blocks_mut()[sel.start().block..=sel.end().block] {
        block.kind = target;
    }

    Ok(out)
}

fn validate_selection(doc: &Document, sel: &Selection) -> Result<(), CommandError> {
    for point in [sel.anchor, sel.focus] {
        let block = doc.block(point.block).ok_or(CommandError::BlockOutOfRange {
            block: point.block,
            len: doc.len(),
        })?;
        let text = block.text();
        if point.offset > text.len() {
            return Err(CommandError::OffsetOutOfRange {
                block: point.block,
                offset: point.offset,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(point.offset) {
            return Err(CommandError::NotCharBoundary {
                block: point.block,
                offset: point.offset,
            });
        }
    }
    Ok(())
}

/// Non-empty `(block, lo, hi)` byte ranges covered by a validated selection.
fn selected_ranges(doc: &Document, sel: Selection) -> impl Iterator<Item = (usize, usize, usize)> {
    let (start, end) = (sel.start(), sel.end());
    (start.block..=end.block).filter_map(move |index| {
        let lo = if index == start.block { start.offset } else { 0 };
        let hi = if index == end.block {
            end.offset
        } else {
            doc.blocks()[index].text_len()
        };
        (lo < hi).then_some((index, lo, hi))
    })
}

/// Leaves paired with their starting byte offset in the block text.
fn leaf_spans(block: &Block) -> impl Iterator<Item = (usize, &InlineLeaf)> {
    block.children.iter().scan(0, |offset, leaf| {
        let start = *offset;
        *offset += leaf.text.len();
        Some((start, leaf))
    })
}

fn intersects(start: usize, leaf: &InlineLeaf, lo: usize, hi: usize) -> bool {
    let end = start + leaf.text.len();
    start < hi && end > lo
}

fn split_and_mark(
    leaves: &[InlineLeaf],
    lo: usize,
    hi: usize,
    mark: Mark,
    value: bool,
) -> Vec<InlineLeaf> {
    let mut out = Vec::with_capacity(leaves.len() + 2);
    let mut start = 0;
    for leaf in leaves {
        let end = start + leaf.text.len();
        if !intersects(start, leaf, lo, hi) {
            out.push(leaf.clone());
            start = end;
            continue;
        }

        let a = lo.max(start) - start;
        let z = hi.min(end) - start;
        let (before, rest) = leaf.text.split_at(a);
        let (middle, after) = rest.split_at(z - a);

        if !before.is_empty() {
            out.push(InlineLeaf::with_marks(before, leaf.marks));
        }
        let mut marks = leaf.marks;
        marks.set(mark, value);
        out.push(InlineLeaf::with_marks(middle, marks));
        if !after.is_empty() {
            out.push(InlineLeaf::with_marks(after, leaf.marks));
        }
        start = end;
    }
    out
}

/// Merge adjacent leaves with equal marks and drop empty ones, keeping at least one leaf.
fn normalize_leaves(leaves: &mut Vec<InlineLeaf>) {
    let mut merged: Vec<InlineLeaf> = Vec::with_capacity(leaves.len());
    for leaf in leaves.drain(..) {
        if leaf.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(prev) if prev.marks == leaf.marks => prev.text.push_str(&leaf.text),
            _ => merged.push(leaf),
        }
    }
    if merged.is_empty() {
        merged.push(InlineLeaf::plain(""));
    }
    *leaves = merged;
}
