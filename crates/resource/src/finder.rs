use crate::bundled::bundled_templates;
use crate::filesystem::FilesystemResourceProvider;
use std::path::Path;
use webgen_traits::{
    Replacements, ResourceError, ResourceProvider, TemplateError, TemplateProvider,
    apply_replacements, trim_final_line_break,
};
use webgen_types::normalize_id;

/// Template provider that consults a chain of resource providers in order.
///
/// The usual chain is an override directory followed by the bundled
/// defaults. A template name is normalized like any other id before the
/// extension is appended, so `{Select}` and `{select}` load `select.html`.
#[derive(Debug)]
pub struct TemplateFinder {
    providers: Vec<Box<dyn ResourceProvider>>,
}

impl Default for TemplateFinder {
    fn default() -> Self {
        Self {
            providers: vec![Box::new(bundled_templates())],
        }
    }
}

impl TemplateFinder {
    /// A finder that only knows the bundled templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// A finder that checks `dir` before the bundled templates.
    pub fn with_override_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new().with_provider_first(Box::new(FilesystemResourceProvider::new(dir)))
    }

    /// An empty chain; mostly useful for tests that supply every template.
    pub fn empty() -> Self {
        Self { providers: Vec::new() }
    }

    /// Puts a provider in front of the chain.
    pub fn with_provider_first(mut self, provider: Box<dyn ResourceProvider>) -> Self {
        self.providers.insert(0, provider);
        self
    }

    /// Appends a provider to the end of the chain.
    pub fn with_provider_last(mut self, provider: Box<dyn ResourceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    fn file_name(name: &str, extension: &str) -> String {
        format!("{}{}", normalize_id(name), extension)
    }

    fn load(&self, file_name: &str) -> Result<String, TemplateError> {
        for provider in &self.providers {
            if !provider.exists(file_name) {
                continue;
            }
            log::trace!("Loading template '{}' from {}", file_name, provider.name());
            return match provider.load(file_name) {
                Ok(text) => Ok(trim_final_line_break(&text).to_string()),
                Err(ResourceError::NotFound(_)) => continue,
                Err(source) => Err(TemplateError::Load {
                    name: file_name.to_string(),
                    source,
                }),
            };
        }
        Err(TemplateError::NotFound(file_name.to_string()))
    }
}

impl TemplateProvider for TemplateFinder {
    fn get_with_extension(
        &self,
        name: &str,
        replacements: Option<&Replacements>,
        extension: &str,
    ) -> Result<String, TemplateError> {
        let text = self.load(&Self::file_name(name, extension))?;
        Ok(apply_replacements(&text, replacements))
    }

    fn exists_with_extension(&self, name: &str, extension: &str) -> bool {
        let file_name = Self::file_name(name, extension);
        self.providers.iter().any(|p| p.exists(&file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use webgen_traits::InMemoryResourceProvider;

    #[test]
    fn test_unknown_template_is_an_error() {
        let finder = TemplateFinder::new();
        let err = finder.get("invalid-template", None).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
        assert!(err.to_string().contains("invalid-template.html"));
    }

    #[test]
    fn test_bundled_template_with_replacements() {
        let finder = TemplateFinder::new();
        let mut replacements = Replacements::new();
        replacements.insert("description".to_string(), "This is a description.".to_string());
        replacements.insert("customSelectClasses".to_string(), String::new());
        replacements.insert("customLabelClasses".to_string(), String::new());
        assert_eq!(
            finder.get("select", Some(&replacements)).unwrap(),
            "<label title=\"This is a description.\" class=\"form-group \">${title}<select id=\"${id}\" class=\"\">${data:select-item}</select></label>"
        );
    }

    #[test]
    fn test_name_is_normalized() {
        let finder = TemplateFinder::new();
        assert_eq!(finder.get("TR", None).unwrap(), "<tr>${content}</tr>");
        assert!(finder.exists("Select-Item"));
    }

    #[test]
    fn test_override_dir_shadows_bundled() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("tr.html"), "<tr class=\"x\">${content}</tr>\n").unwrap();

        let finder = TemplateFinder::with_override_dir(dir.path());
        assert_eq!(finder.get("tr", None).unwrap(), "<tr class=\"x\">${content}</tr>");
        assert_eq!(finder.get("td", None).unwrap(), "<td class=\"${class}\">${title}</td>");
    }

    #[test]
    fn test_other_extension() {
        let finder = TemplateFinder::new();
        let text = finder
            .get_with_extension("webgen-reporting-specification", None, ".wiki")
            .unwrap();
        assert!(text.starts_with("== ${title}"));
    }

    #[test]
    fn test_chain_order() {
        let first = InMemoryResourceProvider::from_static(&[("a.html", "first")]);
        let second = InMemoryResourceProvider::from_static(&[("a.html", "second"), ("b.html", "b")]);
        let finder = TemplateFinder::empty()
            .with_provider_last(Box::new(first))
            .with_provider_last(Box::new(second));
        assert_eq!(finder.get("a", None).unwrap(), "first");
        assert_eq!(finder.get("b", None).unwrap(), "b");
        assert!(!finder.exists("c"));
    }
}
