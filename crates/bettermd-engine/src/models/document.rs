use serde::{Deserialize, Serialize};

/// Text of the single leaf in the document produced from blank input.
pub const PLACEHOLDER_TEXT: &str = "Start editing...";

/// The structural kind of a block.
///
/// Serialized with the element type names of the Slate editor the JSON form is
/// shared with (`heading-one`, `list-item`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Paragraph,
    #[serde(rename = "heading-one")]
    Heading1,
    #[serde(rename = "heading-two")]
    Heading2,
    #[serde(rename = "heading-three")]
    Heading3,
    ListItem,
    BlockQuote,
    CodeBlock,
    TaskList,
    TaskItem,
    Math,
}

/// An independent formatting attribute on an inline leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Code,
}

impl Mark {
    pub const ALL: [Mark; 4] = [Mark::Bold, Mark::Italic, Mark::Underline, Mark::Code];
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The set of marks carried by a leaf. Missing flags are `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
}

impl Marks {
    pub fn get(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Code => self.code,
        }
    }

    pub fn set(&mut self, mark: Mark, value: bool) {
        match mark {
            Mark::Bold => self.bold = value,
            Mark::Italic => self.italic = value,
            Mark::Underline => self.underline = value,
            Mark::Code => self.code = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Mark::ALL.iter().all(|m| !self.get(*m))
    }
}

/// A run of text with its formatting marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineLeaf {
    pub text: String,
    #[serde(flatten)]
    pub marks: Marks,
}

impl InlineLeaf {
    /// A leaf with no marks set.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    pub fn with_marks(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }
}

/// A structural unit of the document.
///
/// Blocks built by this crate always carry at least one leaf. Blocks coming
/// from deserialized JSON are not checked here; the encoder rejects empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub children: Vec<InlineLeaf>,
}

impl Block {
    /// A block holding exactly one unmarked leaf.
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            children: vec![InlineLeaf::plain(text)],
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    /// Concatenated text of all leaves.
    pub fn text(&self) -> String {
        self.children.iter().map(|leaf| leaf.text.as_str()).collect()
    }

    /// Byte length of [`Block::text`].
    pub fn text_len(&self) -> usize {
        self.children.iter().map(|leaf| leaf.text.len()).sum()
    }
}

/// An ordered, never-empty sequence of blocks in source line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Block>", into = "Vec<Block>")]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Build a document from blocks; an empty list yields the placeholder document.
    pub fn new(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::placeholder();
        }
        Self { blocks }
    }

    /// One paragraph holding [`PLACEHOLDER_TEXT`].
    pub fn placeholder() -> Self {
        Self {
            blocks: vec![Block::paragraph(PLACEHOLDER_TEXT)],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Serialize to the Slate-compatible JSON array form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Vec<Block>> for Document {
    fn from(blocks: Vec<Block>) -> Self {
        Self::new(blocks)
    }
}

impl From<Document> for Vec<Block> {
    fn from(doc: Document) -> Self {
        doc.blocks
    }
}
