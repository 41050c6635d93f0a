//! File based configuration for the `webgen` binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use webgen_core::generator::DEFAULT_LANGUAGE;
use webgen_core::policy::DEFAULT_INPUT_TAGS;
use webgen_core::{DEFAULT_REPORT_TITLE, GeneratorBuilder, InputPolicy, WebGenError};
use webgen_source::read_text_file;

/// Settings read from a JSON file. Every key is optional.
///
/// ```json
/// {
///   "language": "sv",
///   "templates_dir": "templates",
///   "report_title": "Sidrapport",
///   "input_tags": ["</button>", "</select>"],
///   "output_dir": "site"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub language: String,
    pub templates_dir: Option<PathBuf>,
    pub report_title: String,
    /// Closing tags that make a rendered fragment count as a data input.
    pub input_tags: Vec<String>,
    pub output_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            templates_dir: None,
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            input_tags: DEFAULT_INPUT_TAGS.iter().map(|t| t.to_string()).collect(),
            output_dir: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self, WebGenError> {
        serde_json::from_str(json).map_err(|e| WebGenError::Config(format!("Invalid configuration: {e}")))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WebGenError> {
        let path = path.as_ref();
        let json = read_text_file(path)?;
        serde_json::from_str(&json)
            .map_err(|e| WebGenError::Config(format!("Invalid configuration in '{}': {}", path.display(), e)))
    }

    pub fn input_policy(&self) -> InputPolicy {
        InputPolicy::new(&self.input_tags)
    }

    /// Copies these settings onto a generator builder.
    pub fn apply(&self, builder: GeneratorBuilder) -> GeneratorBuilder {
        let builder = builder
            .with_language(self.language.as_str())
            .with_report_title(self.report_title.as_str())
            .with_input_policy(self.input_policy());
        match &self.templates_dir {
            Some(dir) => builder.with_templates_dir(dir),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.language, "en");
        assert_eq!(config.report_title, "WebGen report");
        assert_eq!(config.input_tags, vec!["</button>"]);
    }

    #[test]
    fn test_full_config() {
        let config = GeneratorConfig::from_json(
            r#"{"language": "sv", "templates_dir": "tpl", "report_title": "Sidrapport",
                "input_tags": ["</select>"], "output_dir": "site"}"#,
        )
        .unwrap();
        assert_eq!(config.language, "sv");
        assert_eq!(config.templates_dir, Some(PathBuf::from("tpl")));
        assert_eq!(config.output_dir, Some(PathBuf::from("site")));
        assert!(config.input_policy().counts_as_input("<select></select>"));
        assert!(!config.input_policy().counts_as_input("<button></button>"));
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let err = GeneratorConfig::from_json("{\"language\": 3}").unwrap_err();
        assert!(matches!(err, WebGenError::Config(_)));
    }

    #[test]
    fn test_load_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("webgen.json");
        fs::write(&path, "not json").unwrap();
        let err = GeneratorConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("webgen.json"));
    }
}
