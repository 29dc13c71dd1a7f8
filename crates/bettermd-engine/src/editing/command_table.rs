use std::collections::BTreeMap;

use crate::models::{BlockKind, Document, Mark, Selection};

use super::commands::{CommandError, toggle_block, toggle_format};

/// A named command: one Command Layer call over a document and selection.
pub type CommandHandler = fn(&Document, &Selection) -> Result<Document, CommandError>;

/// Fixed mapping from command name to handler, built once and never mutated.
pub struct CommandTable {
    handlers: BTreeMap<&'static str, CommandHandler>,
}

impl CommandTable {
    pub fn new() -> Self {
        let mut handlers: BTreeMap<&'static str, CommandHandler> = BTreeMap::new();
        handlers.insert("toggle-bold", |d, s| toggle_format(d, s, Mark::Bold));
        handlers.insert("toggle-italic", |d, s| toggle_format(d, s, Mark::Italic));
        handlers.insert("toggle-underline", |d, s| {
            toggle_format(d, s, Mark::Underline)
        });
        handlers.insert("toggle-code", |d, s| toggle_format(d, s, Mark::Code));
        handlers.insert("set-heading-1", |d, s| {
            toggle_block(d, s, BlockKind::Heading1)
        });
        handlers.insert("set-heading-2", |d, s| {
            toggle_block(d, s, BlockKind::Heading2)
        });
        handlers.insert("set-heading-3", |d, s| {
            toggle_block(d, s, BlockKind::Heading3)
        });
        handlers.insert("toggle-quote", |d, s| {
            toggle_block(d, s, BlockKind::BlockQuote)
        });
        handlers.insert("toggle-list-item", |d, s| {
            toggle_block(d, s, BlockKind::ListItem)
        });
        handlers.insert("toggle-code-block", |d, s| {
            toggle_block(d, s, BlockKind::CodeBlock)
        });
        Self { handlers }
    }

    /// Command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Run the command called `name`.
    pub fn execute(
        &self,
        name: &str,
        doc: &Document,
        sel: &Selection,
    ) -> Result<Document, CommandError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        handler(doc, sel)
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}
