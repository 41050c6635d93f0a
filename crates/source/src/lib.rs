//! Input sources for the webgen pipeline.
//!
//! - [`text`]: reads specification, dictionary and data inputs fully into strings
//! - [`xml`]: the read-only [`DataTree`] queried during data binding

pub mod text;
pub mod xml;

use thiserror::Error;

pub use text::{extract_text, read_text_file, split_lines};
pub use xml::{DataNode, DataTree, NodeKind};

/// Errors raised while loading structured data.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Failed to read data source '{locator}': {message}")]
    Unreadable { locator: String, message: String },
}
