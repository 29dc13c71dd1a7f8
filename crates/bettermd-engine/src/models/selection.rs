/// A position inside a document: a block index and a byte offset into the
/// block's concatenated leaf text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub block: usize,
    pub offset: usize,
}

impl Point {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// An anchor/focus pair. The focus may precede the anchor (backward selection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// A collapsed selection (caret) at `point`.
    pub fn caret(point: Point) -> Self {
        Self::new(point, point)
    }

    /// Select `start..end` bytes of a single block.
    pub fn within_block(block: usize, start: usize, end: usize) -> Self {
        Self::new(Point::new(block, start), Point::new(block, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The earlier of anchor and focus.
    pub fn start(&self) -> Point {
        self.anchor.min(self.focus)
    }

    /// The later of anchor and focus.
    pub fn end(&self) -> Point {
        self.anchor.max(self.focus)
    }
}
