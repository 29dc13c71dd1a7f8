pub mod document;
pub mod selection;

pub use document::*;
pub use selection::*;
