/*!
 * # Editing Core
 *
 * The command layer that applies formatting and block-type toggles to a
 * [`Document`](crate::models::Document), and the session that owns the document
 * while a user edits it.
 *
 * ## Architecture Overview
 *
 * ### 1. Pure Commands
 * - `toggle_format` and `toggle_block` take a document and a selection and return
 *   a new document; the input is never mutated
 * - "Active" means any node touched by the selection already has the mark/kind;
 *   an active toggle clears, an inactive one sets
 * - Clearing a block kind means turning it back into a paragraph
 *
 * ### 2. Named Command Table
 * - A fixed `CommandTable` maps names such as `toggle-bold` or `set-heading-2`
 *   to exactly one command call
 * - A `Keymap` maps key chords (`Ctrl+B`) to those names at the UI boundary
 *
 * ### 3. Session and Change Notifications
 * - `EditingSession` holds the document, the selection and a version counter
 * - Every successful mutation re-encodes Markdown and notifies subscribers with
 *   a `DocumentChanged` event for the host to hand to the renderer
 *
 * ## Module Structure
 *
 * - **`commands`**: toggles, active-state queries and `CommandError`
 * - **`command_table`**: name to handler mapping
 * - **`keymap`**: key chord parsing and default bindings
 * - **`session`**: `EditingSession` and `DocumentChanged`
 */

pub mod command_table;
pub mod commands;
pub mod keymap;
pub mod session;

pub use command_table::{CommandHandler, CommandTable};
pub use commands::{CommandError, is_block_active, is_mark_active, toggle_block, toggle_format};
pub use keymap::{KeyChord, KeyChordError, Keymap, Modifiers};
pub use session::{DocumentChanged, EditingSession, SessionError};
