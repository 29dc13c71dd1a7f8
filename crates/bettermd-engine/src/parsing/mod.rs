//! # Markdown Codec
//!
//! Converts between flat Markdown text and the block/inline [`Document`] tree.
//!
//! ## Decoding
//!
//! Line-scoped and single-pass: the input is split on `\n` and each line is
//! classified on its own by [`MarkdownLineClassifier`] using ordered prefix rules
//! (first match wins):
//!
//! | prefix | block | leaf text |
//! |---|---|---|
//! | `# ` | `Heading1` | remainder |
//! | `## ` | `Heading2` | remainder |
//! | `### ` | `Heading3` | remainder |
//! | starts and ends with `**` | `Paragraph` | whole line |
//! | `* ` or `- ` | `ListItem` | remainder |
//! | anything else | `Paragraph` | whole line |
//!
//! There is no lookahead: fenced code, nested lists and inline emphasis are not
//! recognised. Decoding never fails.
//!
//! A trailing `\r` is stripped from every line so CRLF files decode like LF
//! files. A block whose text itself ends in `\r` therefore loses it on the way
//! back in.
//!
//! ## Encoding
//!
//! Each block becomes one template and blocks are joined with `\n`. The encoder
//! is lossy on purpose: `*` list markers come back as `-`, and inline marks are
//! dropped unless [`EncodeOptions::marks`] is set.
//!
//! `encode(decode(..))` is idempotent: applying it to any text twice gives the
//! same result as applying it once. Encoded text is not always a fixed point on
//! its own: a paragraph reading `* x` encodes to `* x`, which decodes as a list
//! item and comes back as `- x`.
//!
//! [`Document`]: crate::models::Document

pub mod classify;
pub mod decode;
pub mod encode;

pub use classify::{LineClass, MarkdownLineClassifier, Rule};
pub use decode::{decode, lines};
pub use encode::{EncodeError, EncodeOptions, encode, encode_with};
