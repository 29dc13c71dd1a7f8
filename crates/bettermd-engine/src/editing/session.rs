use thiserror::Error;

use crate::models::{BlockKind, Document, Mark, Point, Selection};
use crate::parsing::{EncodeError, decode, encode};

use super::command_table::CommandTable;
use super::commands::{CommandError, toggle_block, toggle_format};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Notification sent to subscribers after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChanged {
    pub version: u64,
    /// The document re-encoded as Markdown.
    pub markdown: String,
}

type ChangeListener = Box<dyn FnMut(&DocumentChanged)>;

/// The active editing session: sole owner of the document and its selection.
///
/// Every mutation re-derives the Markdown text through the encoder, bumps the
/// version and notifies subscribers. A failed mutation changes nothing.
pub struct EditingSession {
    document: Document,
    selection: Selection,
    version: u64,
    markdown: String,
    commands: CommandTable,
    listeners: Vec<ChangeListener>,
}

impl EditingSession {
    /// Start a session from Markdown text (pasted, uploaded or read from disk).
    pub fn from_markdown(text: &str) -> Result<Self, EncodeError> {
        Self::from_document(decode(text))
    }

    pub fn from_document(document: Document) -> Result<Self, EncodeError> {
        let markdown = encode(&document)?;
        Ok(Self {
            document,
            selection: Selection::caret(Point::new(0, 0)),
            version: 0,
            markdown,
            commands: CommandTable::new(),
            listeners: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection. It is validated when the next command runs.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Markdown for the current document.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentChanged) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Run a named command on the current selection. Returns the new version.
    pub fn run(&mut self, name: &str) -> Result<u64, SessionError> {
        log::debug!("running command {name} on {:?}", self.selection);
        let doc = self
            .commands
            .execute(name, &self.document, &self.selection)?;
        self.commit(doc)
    }

    pub fn toggle_format(&mut self, mark: Mark) -> Result<u64, SessionError> {
        let doc = toggle_format(&self.document, &self.selection, mark)?;
        self.commit(doc)
    }

    pub fn toggle_block(&mut self, kind: BlockKind) -> Result<u64, SessionError> {
        let doc = toggle_block(&self.document, &self.selection, kind)?;
        self.commit(doc)
    }

    /// Rebuild the document from new Markdown text and put the caret at the start.
    pub fn replace_markdown(&mut self, text: &str) -> Result<u64, SessionError> {
        let version = self.commit(decode(text))?;
        self.selection = Selection::caret(Point::new(0, 0));
        Ok(version)
    }

    fn commit(&mut self, document: Document) -> Result<u64, SessionError> {
        let markdown = encode(&document)?;
        self.document = document;
        self.markdown = markdown;
        self.version += 1;

        let event = DocumentChanged {
            version: self.version,
            markdown: self.markdown.clone(),
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
        Ok(self.version)
    }
}
