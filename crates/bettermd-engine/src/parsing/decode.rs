use crate::models::{Block, Document};

use super::classify::MarkdownLineClassifier;

/// Decode Markdown text into a [`Document`].
///
/// Never fails: blank input yields the placeholder document and every other
/// line becomes exactly one single-leaf block.
pub fn decode(text: &str) -> Document {
    if text.trim().is_empty() {
        return Document::placeholder();
    }

    let classifier = MarkdownLineClassifier;
    let blocks = lines(text)
        .map(|line| {
            let class = classifier.classify(line);
            Block::new(class.kind, class.text)
        })
        .collect();

    Document::new(blocks)
}

/// The lines [`decode`] turns into blocks: split on `\n` with a trailing `\r`
/// removed. A final newline yields a last empty line.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}
