use thiserror::Error;

use crate::models::{Block, BlockKind, Document, InlineLeaf};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Block {index} has no inline leaves")]
    EmptyBlock { index: usize },
}

/// Options for [`encode_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Wrap marked leaves in Markdown delimiters instead of dropping the marks.
    pub marks: bool,
}

/// Encode a document as Markdown, one template per block, joined by `\n`.
///
/// Inline marks are not written. List items always use the `-` marker.
pub fn encode(doc: &Document) -> Result<String, EncodeError> {
    encode_with(doc, EncodeOptions::default())
}

/// Encode a document as Markdown with the given options.
pub fn encode_with(doc: &Document, options: EncodeOptions) -> Result<String, EncodeError> {
    let lines = doc
        .blocks()
        .iter()
        .enumerate()
        .map(|(index, block)| encode_block(index, block, options))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines.join("\n"))
}

fn encode_block(index: usize, block: &Block, options: EncodeOptions) -> Result<String, EncodeError> {
    if block.children.is_empty() {
        return Err(EncodeError::EmptyBlock { index });
    }

    let text: String = if options.marks {
        block.children.iter().map(wrap_marks).collect()
    } else {
        block.text()
    };

    Ok(match block.kind {
        BlockKind::Heading1 => format!("# {text}"),
        BlockKind::Heading2 => format!("## {text}"),
        BlockKind::Heading3 => format!("### {text}"),
        BlockKind::CodeBlock => format!("```\n{text}\n```"),
        BlockKind::ListItem => format!("- {text}"),
        BlockKind::BlockQuote => format!("> {text}"),
        BlockKind::Paragraph
        | BlockKind::TaskList
        | BlockKind::TaskItem
        | BlockKind::Math => text,
    })
}

fn wrap_marks(leaf: &InlineLeaf) -> String {
    let mut out = leaf.text.clone();
    if out.is_empty() {
        return out;
    }
    if leaf.marks.code {
        out = format!("`{out}`");
    }
    if leaf.marks.bold {
        out = format!("**{out}**");
    }
    if leaf.marks.italic {
        out = format!("*{out}*");
    }
    if leaf.marks.underline {
        out = format!("<u>{out}</u>");
    }
    out
}
