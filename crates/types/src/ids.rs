//! Newtype wrapper and normalization rules for HTML ids
//!
//! Every id that ends up in generated markup, and every file name derived
//! from an artifact title, goes through [`normalize_id`]. Keeping the result
//! in an [`HtmlId`] prevents mixing normalized tokens with raw titles.

use std::fmt;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Token used when normalization leaves nothing behind.
pub const EMPTY_ID: &str = "_";

/// An identifier that is safe to use as an HTML id, a URL fragment, or a file stem.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct HtmlId(Arc<str>);

impl HtmlId {
    /// Normalizes arbitrary text into an id.
    pub fn normalize(text: &str) -> Self {
        Self(normalize_id(text).into())
    }

    /// Wraps a value that is already known to be normalized.
    pub(crate) fn from_normalized(id: String) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for HtmlId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for HtmlId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for HtmlId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for HtmlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strips combining marks after canonical decomposition and drops whatever
/// is still outside ASCII.
pub fn remove_diacritics(text: &str) -> String {
    text.nfd().filter(char::is_ascii).collect()
}

/// Converts text into a URL/HTML-id-safe token.
///
/// Lower-cases, removes diacritics, turns whitespace and slashes into `_`,
/// and drops every other character outside `[a-z0-9_-]`. The result is never
/// empty and normalizing it again yields the same value.
pub fn normalize_id(text: &str) -> String {
    let folded = remove_diacritics(&text.to_lowercase());
    let id: String = folded
        .chars()
        .filter_map(|c| match c {
            ' ' | '\t' | '\n' | '\r' | '/' | '\\' => Some('_'),
            'a'..='z' | '0'..='9' | '_' | '-' => Some(c),
            _ => None,
        })
        .collect();
    if id.is_empty() {
        EMPTY_ID.to_string()
    } else {
        id
    }
}
