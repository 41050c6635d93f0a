use crate::ids::{HtmlId, normalize_id};
use std::collections::HashSet;

/// Set of ids already issued inside one artifact.
///
/// Collisions are resolved by appending `_1`, `_2`, ... with the smallest
/// suffix that is still free. A registry is created empty for each artifact.
#[derive(Debug, Default, Clone)]
pub struct IdRegistry {
    issued: HashSet<String>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a unique id derived from a title.
    pub fn create_id(&mut self, context: &str) -> HtmlId {
        self.register(normalize_id(context))
    }

    /// Issues a unique id for a component.
    ///
    /// Untitled components derive the candidate from their type, prefixed with
    /// `_` so it cannot collide with a title-derived id.
    pub fn create_component_id(&mut self, component_type: &str, title: &str) -> HtmlId {
        if title.is_empty() {
            self.create_id(&format!("_{component_type}"))
        } else {
            self.create_id(title)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.issued.contains(id)
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    fn register(&mut self, candidate: String) -> HtmlId {
        let id = if self.issued.contains(&candidate) {
            let mut seq = 1;
            while self.issued.contains(&format!("{candidate}_{seq}")) {
                seq += 1;
            }
            format!("{candidate}_{seq}")
        } else {
            candidate
        };
        log::trace!("Issued id '{}'", id);
        self.issued.insert(id.clone());
        HtmlId::from_normalized(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_title_twice_gets_suffix() {
        let mut registry = IdRegistry::new();
        assert_eq!(registry.create_id("Item"), "item");
        assert_eq!(registry.create_id("Item"), "item_1");
        assert_eq!(registry.create_id("item"), "item_2");
    }

    #[test]
    fn test_smallest_free_suffix_is_used() {
        let mut registry = IdRegistry::new();
        registry.create_id("row_1");
        assert_eq!(registry.create_id("row"), "row");
        assert_eq!(registry.create_id("row"), "row_2");
    }

    #[test]
    fn test_distinct_titles_stay_distinct() {
        let mut registry = IdRegistry::new();
        let titles = ["Alpha", "Beta", "Gamma", "alpha", "ALPHA"];
        let ids: Vec<HtmlId> = titles.iter().map(|t| registry.create_id(t)).collect();
        let unique: HashSet<&HtmlId> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_untitled_component_uses_type() {
        let mut registry = IdRegistry::new();
        assert_eq!(registry.create_component_id("table", ""), "_table");
        assert_eq!(registry.create_component_id("table", ""), "_table_1");
        assert_eq!(registry.create_component_id("table", "table"), "table");
    }
}
