//! TemplateProvider trait: named template lookup with `${key}` replacements.

use crate::resource::ResourceError;
use std::collections::BTreeMap;
use thiserror::Error;

/// Extension appended to template names when none is given.
pub const DEFAULT_TEMPLATE_EXTENSION: &str = ".html";

/// Named replacement values applied to a template as `${name}` -> value.
pub type Replacements = BTreeMap<String, String>;

#[derive(Error, Debug, Clone)]
pub enum TemplateError {
    #[error("Template resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load template '{name}': {source}")]
    Load {
        name: String,
        #[source]
        source: ResourceError,
    },
}

/// Looks up raw template text by name.
///
/// Implementations must fail with [`TemplateError::NotFound`] for unknown
/// names rather than returning empty text.
pub trait TemplateProvider: Send + Sync {
    /// Loads `name` with the given extension and applies `replacements`.
    fn get_with_extension(
        &self,
        name: &str,
        replacements: Option<&Replacements>,
        extension: &str,
    ) -> Result<String, TemplateError>;

    /// Whether a template with this name and extension can be loaded.
    fn exists_with_extension(&self, name: &str, extension: &str) -> bool;

    /// Loads an `.html` template.
    fn get(&self, name: &str, replacements: Option<&Replacements>) -> Result<String, TemplateError> {
        self.get_with_extension(name, replacements, DEFAULT_TEMPLATE_EXTENSION)
    }

    fn exists(&self, name: &str) -> bool {
        self.exists_with_extension(name, DEFAULT_TEMPLATE_EXTENSION)
    }
}

/// Replaces every `${key}` with its value. Values are inserted literally.
pub fn apply_replacements(text: &str, replacements: Option<&Replacements>) -> String {
    let Some(replacements) = replacements else {
        return text.to_string();
    };
    replacements
        .iter()
        .fold(text.to_string(), |acc, (key, value)| {
            acc.replace(&format!("${{{key}}}"), value)
        })
}

/// Drops a single trailing line terminator, as left by editors at end of file.
pub fn trim_final_line_break(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replacements_literal_values() {
        let mut replacements = Replacements::new();
        replacements.insert("class".to_string(), "$1 text-right".to_string());
        replacements.insert("missing".to_string(), "x".to_string());
        let text = "<td class=\"${class}\">${title}</td>";
        assert_eq!(
            apply_replacements(text, Some(&replacements)),
            "<td class=\"$1 text-right\">${title}</td>"
        );
    }

    #[test]
    fn test_trim_final_line_break_only_once() {
        assert_eq!(trim_final_line_break("<tr>\n\n"), "<tr>\n");
        assert_eq!(trim_final_line_break("<tr>\r\n"), "<tr>");
        assert_eq!(trim_final_line_break("<tr>"), "<tr>");
    }

    #[test]
    fn test_apply_replacements_none_is_identity() {
        assert_eq!(apply_replacements("${id}", None), "${id}");
    }
}
