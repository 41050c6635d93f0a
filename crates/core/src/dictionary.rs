//! Data dictionary: per-field behavior for generated input fields.
//!
//! ```text
//! * Email: Where we can reach you
//! ** placeholder: name@example.com
//! * Country
//! ** input: select(XML=countries.xml)(class=wide)
//! * Mail=Email
//! ```

use std::collections::{HashMap, HashSet};
use webgen_source::split_lines;

pub const DESCRIPTION: &str = "description";
pub const PLACEHOLDER: &str = "placeholder";
pub const INPUT: &str = "input";

/// Input kind used when the dictionary says nothing about a field.
pub const DEFAULT_INPUT: &str = "text-input";

#[derive(Debug, Clone, Default)]
pub struct DataDictionary {
    behaviors: HashMap<String, HashMap<String, String>>,
    aliases: HashMap<String, String>,
}

fn field_key(field: &str) -> String {
    field.trim().to_lowercase()
}

impl DataDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        let mut dictionary = Self::new();
        let mut current: Option<String> = None;

        for line in split_lines(text) {
            let line = line.trim();
            if let Some(property) = line.strip_prefix("**") {
                let Some(field) = &current else {
                    log::warn!("Ignoring dictionary property outside a field: '{}'", line);
                    continue;
                };
                match property.split_once(':') {
                    Some((key, value)) => dictionary.set(field, key.trim(), value.trim()),
                    None => log::warn!("Ignoring unparseable dictionary property: '{}'", line),
                }
            } else if let Some(declaration) = line.strip_prefix('*') {
                current = Some(dictionary.declare(declaration));
            }
        }
        dictionary
    }

    /// Handles `field`, `field=source` and `field: description`, whichever
    /// separator comes first.
    fn declare(&mut self, declaration: &str) -> String {
        let alias_at = declaration.find('=');
        let description_at = declaration.find(':');
        match (alias_at, description_at) {
            (Some(a), d) if d.is_none_or(|d| a < d) => {
                let field = field_key(&declaration[..a]);
                self.add_alias(&field, &field_key(&declaration[a + 1..]));
                field
            }
            (_, Some(d)) => {
                let field = field_key(&declaration[..d]);
                self.set(&field, DESCRIPTION, declaration[d + 1..].trim());
                field
            }
            _ => field_key(declaration),
        }
    }

    pub fn set(&mut self, field: &str, property: &str, value: &str) {
        self.behaviors
            .entry(field_key(field))
            .or_default()
            .insert(property.to_lowercase(), value.to_string());
    }

    /// Makes `field` read its behavior from `source`, unless that would close a cycle.
    pub fn add_alias(&mut self, field: &str, source: &str) {
        let (field, source) = (field_key(field), field_key(source));
        if self.resolve(&source) == field {
            log::warn!("Ignoring cyclic alias '{}' -> '{}'", field, source);
            return;
        }
        self.aliases.insert(field, source);
    }

    /// Follows aliases transitively.
    pub fn resolve(&self, field: &str) -> String {
        let mut key = field_key(field);
        let mut seen = HashSet::new();
        while let Some(next) = self.aliases.get(&key) {
            if !seen.insert(key.clone()) {
                break;
            }
            key = next.clone();
        }
        key
    }

    pub fn behavior(&self, field: &str, property: &str) -> Option<&str> {
        let property = property.to_lowercase();
        let lookup = |key: &str| {
            self.behaviors
                .get(key)
                .and_then(|props| props.get(&property))
                .map(String::as_str)
        };
        lookup(&field_key(field)).or_else(|| lookup(&self.resolve(field)))
    }

    pub fn description(&self, field: &str) -> &str {
        self.behavior(field, DESCRIPTION).unwrap_or("")
    }

    pub fn placeholder(&self, field: &str) -> &str {
        self.behavior(field, PLACEHOLDER).unwrap_or("")
    }

    /// The input directive body for a field, `text-input` by default.
    pub fn input(&self, field: &str) -> &str {
        self.behavior(field, INPUT)
            .filter(|input| !input.is_empty())
            .unwrap_or(DEFAULT_INPUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICTIONARY: &str = "* Email: Where we can reach you\n\
                              ** placeholder: name@example.com\n\
                              ** Pattern: .+@.+\n\
                              * Country\n\
                              ** input: select(XML=countries.xml)(class=wide)\n\
                              * Mail=Email\n\
                              * Post=Mail\n\
                              ** broken line\n";

    #[test]
    fn test_defaults_for_unknown_field() {
        let dictionary = DataDictionary::parse(DICTIONARY);
        assert_eq!(dictionary.description("Phone"), "");
        assert_eq!(dictionary.placeholder("Phone"), "");
        assert_eq!(dictionary.input("Phone"), DEFAULT_INPUT);
    }

    #[test]
    fn test_field_behavior() {
        let dictionary = DataDictionary::parse(DICTIONARY);
        assert_eq!(dictionary.description("Email"), "Where we can reach you");
        assert_eq!(dictionary.placeholder("EMAIL"), "name@example.com");
        assert_eq!(dictionary.behavior("email", "pattern"), Some(".+@.+"));
        assert_eq!(dictionary.input("Country"), "select(XML=countries.xml)(class=wide)");
    }

    #[test]
    fn test_aliases_resolve_transitively() {
        let dictionary = DataDictionary::parse(DICTIONARY);
        assert_eq!(dictionary.resolve("Post"), "email");
        assert_eq!(dictionary.placeholder("Post"), "name@example.com");
    }

    #[test]
    fn test_cyclic_alias_is_ignored() {
        let mut dictionary = DataDictionary::new();
        dictionary.add_alias("a", "b");
        dictionary.add_alias("b", "a");
        assert_eq!(dictionary.resolve("a"), "b");
        assert_eq!(dictionary.resolve("b"), "b");
    }

    #[test]
    fn test_description_may_contain_equals() {
        let dictionary = DataDictionary::parse("* Price: net = gross - vat");
        assert_eq!(dictionary.description("price"), "net = gross - vat");
        assert_eq!(dictionary.resolve("price"), "price");
    }

    #[test]
    fn test_property_splits_at_first_colon() {
        let dictionary = DataDictionary::parse("* Url\n** placeholder: https://example.com");
        assert_eq!(dictionary.placeholder("url"), "https://example.com");
    }
}
