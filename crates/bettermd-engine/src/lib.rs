pub mod editing;
pub mod io;
pub mod models;
pub mod parsing;
pub mod plugins;
pub mod render;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{CommandError, CommandTable, DocumentChanged, EditingSession, KeyChord, Keymap};
pub use io::{IoError, ingest_upload, read_markdown_file, write_markdown_file};
pub use models::{Block, BlockKind, Document, InlineLeaf, Mark, Marks, Point, Selection};
pub use parsing::{EncodeError, EncodeOptions, decode, encode, encode_with};
pub use plugins::{BuiltinPlugin, Lifecycle, PluginDescriptor, PluginError, PluginKind, PluginRegistry};
pub use render::{Notification, PreviewSequencer, RenderError, RenderRequest, RenderResponse};
