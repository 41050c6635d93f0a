//! The generation driver: specification lines in, artifacts out.

use crate::artifact::{Artifact, ArtifactBuilder};
use crate::cleanup;
use crate::component::ComponentParser;
use crate::dictionary::DataDictionary;
use crate::error::WebGenError;
use crate::expand::Engine;
use crate::output::Fragment;
use crate::policy::InputPolicy;
use crate::report::{self, DEFAULT_REPORT_TITLE, REPORT_SPECIFICATION, REPORT_SPECIFICATION_EXTENSION};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use webgen_resource::TemplateFinder;
use webgen_source::{DataTree, read_text_file, split_lines};
use webgen_traits::{Replacements, TemplateProvider};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Template every artifact starts from.
pub const PAGE_TEMPLATE: &str = "web-page";

static ARTIFACT_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*==[^=]").expect("heading pattern is valid"));

/// Title of the artifact started by `line`, if it is an `== Title` heading.
pub fn artifact_heading(line: &str) -> Option<String> {
    ARTIFACT_HEADING_RE
        .is_match(line)
        .then(|| line.replace("==", "").trim().to_string())
}

/// Number of `*`/`#` markers in the leading run of ` *#` characters.
pub fn nesting_level(line: &str) -> usize {
    line.chars()
        .take_while(|c| matches!(c, ' ' | '*' | '#'))
        .filter(|c| *c != ' ')
        .count()
}

fn read_input(path: &Path) -> Result<String, WebGenError> {
    read_text_file(path).map_err(WebGenError::from)
}

/// A builder for creating a [`Generator`].
pub struct GeneratorBuilder {
    specification: Option<String>,
    dictionary: DataDictionary,
    data: Option<DataTree>,
    templates: Option<Arc<dyn TemplateProvider>>,
    templates_dir: Option<PathBuf>,
    base_dir: Option<PathBuf>,
    language: String,
    report_title: String,
    policy: InputPolicy,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            specification: None,
            dictionary: DataDictionary::new(),
            data: None,
            templates: None,
            templates_dir: None,
            base_dir: None,
            language: DEFAULT_LANGUAGE.to_string(),
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            policy: InputPolicy::default(),
        }
    }
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_specification(mut self, specification: impl Into<String>) -> Self {
        self.specification = Some(specification.into());
        self
    }

    /// Reads the specification from a file. Embedded data locators resolve
    /// relative to the file's directory unless a base directory is set.
    pub fn with_specification_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, WebGenError> {
        let path = path.as_ref();
        self.specification = Some(read_input(path)?);
        if self.base_dir.is_none() {
            self.base_dir = path.parent().map(Path::to_path_buf);
        }
        Ok(self)
    }

    pub fn with_data_dictionary(mut self, dictionary: &str) -> Self {
        self.dictionary = DataDictionary::parse(dictionary);
        self
    }

    pub fn with_data_dictionary_file<P: AsRef<Path>>(self, path: P) -> Result<Self, WebGenError> {
        let text = read_input(path.as_ref())?;
        Ok(self.with_data_dictionary(&text))
    }

    /// Parses the ambient data tree from XML text.
    pub fn with_data(mut self, xml: &str) -> Result<Self, WebGenError> {
        self.data = Some(DataTree::parse(xml)?);
        Ok(self)
    }

    pub fn with_data_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, WebGenError> {
        self.data = Some(DataTree::load(path)?);
        Ok(self)
    }

    pub fn with_data_tree(mut self, tree: DataTree) -> Self {
        self.data = Some(tree);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Templates in `dir` shadow the bundled ones with the same name.
    pub fn with_templates_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.templates_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Replaces template lookup entirely; `with_templates_dir` is then ignored.
    pub fn with_template_provider(mut self, templates: Arc<dyn TemplateProvider>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn with_report_title(mut self, title: impl Into<String>) -> Self {
        self.report_title = title.into();
        self
    }

    pub fn with_input_policy(mut self, policy: InputPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Directory that relative `XML=` locators resolve against.
    pub fn with_base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<Generator, WebGenError> {
        let specification = self.specification.ok_or_else(|| {
            WebGenError::Config(
                "No specification has been configured. Use `with_specification` or `with_specification_file`."
                    .to_string(),
            )
        })?;

        let templates: Arc<dyn TemplateProvider> = match (self.templates, self.templates_dir) {
            (Some(templates), _) => templates,
            (None, Some(dir)) => {
                if !dir.is_dir() {
                    return Err(WebGenError::Config(format!(
                        "Template directory '{}' does not exist",
                        dir.display()
                    )));
                }
                Arc::new(TemplateFinder::with_override_dir(dir))
            }
            (None, None) => Arc::new(TemplateFinder::new()),
        };

        let parser = match self.base_dir {
            Some(dir) => ComponentParser::with_base_dir(dir),
            None => ComponentParser::new(),
        };

        Ok(Generator {
            specification,
            dictionary: self.dictionary,
            data: self.data.map(Arc::new),
            templates,
            parser,
            policy: self.policy,
            language: self.language,
            report_title: self.report_title,
        })
    }
}

/// Runs the whole pipeline for one specification.
///
/// Generation is a pure function of the inputs: calling
/// [`generate_artifacts`](Self::generate_artifacts) twice yields the same
/// artifacts, which is what lets the report pass reuse the generator.
pub struct Generator {
    specification: String,
    dictionary: DataDictionary,
    data: Option<Arc<DataTree>>,
    templates: Arc<dyn TemplateProvider>,
    parser: ComponentParser,
    policy: InputPolicy,
    language: String,
    report_title: String,
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::new()
    }

    pub fn specification(&self) -> &str {
        &self.specification
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn report_title(&self) -> &str {
        &self.report_title
    }

    fn start_artifact(&self, title: &str) -> Result<ArtifactBuilder, WebGenError> {
        log::info!("Starting artifact '{}'", title);
        let mut replacements = Replacements::new();
        replacements.insert("lang".to_string(), self.language.clone());
        replacements.insert("title".to_string(), title.to_string());
        let page = self.templates.get(PAGE_TEMPLATE, Some(&replacements))?;
        Ok(ArtifactBuilder::new(title, Fragment::from_template(&page)))
    }

    /// Builds every artifact of the specification and runs the cleanup passes.
    pub fn generate_artifacts(&self) -> Result<Vec<Artifact>, WebGenError> {
        let engine = Engine::new(
            self.templates.as_ref(),
            &self.dictionary,
            &self.parser,
            &self.policy,
            self.data.as_deref(),
        );

        let mut builders: Vec<ArtifactBuilder> = Vec::new();
        for line in split_lines(&self.specification) {
            if let Some(title) = artifact_heading(line) {
                builders.push(self.start_artifact(&title)?);
                continue;
            }
            let Some(artifact) = builders.last_mut() else {
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }

            let level = nesting_level(line);
            if level >= artifact.depth() {
                log::warn!("Line nested deeper than any open component: '{}'", line.trim());
            }
            artifact.enter_level(level);

            let component = self.parser.parse(line)?;
            let fragment = engine.expand(&component, artifact)?;
            if self.policy.counts_as_input(&fragment.text()) {
                artifact.count_input();
            }
            artifact.insert(fragment);
        }

        let mut artifacts: Vec<Artifact> = builders.into_iter().map(ArtifactBuilder::finish).collect();
        cleanup::apply_automenu(&mut artifacts, self.templates.as_ref())?;
        for artifact in &mut artifacts {
            let content = cleanup::finalize(artifact.content());
            artifact.set_content(content);
        }
        Ok(artifacts)
    }

    /// Runs the pipeline again over a synthetic specification and data tree
    /// describing `artifacts`.
    pub fn reports(&self, artifacts: &[Artifact]) -> Result<Vec<Artifact>, WebGenError> {
        log::info!("Generating report '{}' for {} artifacts", self.report_title, artifacts.len());
        let xml = report::report_data(&self.report_title, artifacts)?;

        let mut replacements = Replacements::new();
        replacements.insert("title".to_string(), self.report_title.clone());
        let specification = self.templates.get_with_extension(
            REPORT_SPECIFICATION,
            Some(&replacements),
            REPORT_SPECIFICATION_EXTENSION,
        )?;

        let report_generator = Generator {
            specification,
            dictionary: DataDictionary::new(),
            data: Some(Arc::new(DataTree::parse(&xml)?)),
            templates: Arc::clone(&self.templates),
            parser: self.parser.clone(),
            policy: self.policy.clone(),
            language: self.language.clone(),
            report_title: self.report_title.clone(),
        };
        report_generator.generate_artifacts()
    }

    /// Artifacts followed by their reports.
    pub fn generate(&self) -> Result<Generation, WebGenError> {
        let artifacts = self.generate_artifacts()?;
        let reports = self.reports(&artifacts)?;
        Ok(Generation { artifacts, reports })
    }
}

/// The output of one run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub artifacts: Vec<Artifact>,
    pub reports: Vec<Artifact>,
}

impl Generation {
    pub fn save_artifacts_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<(), WebGenError> {
        save_artifacts_to_dir(&self.artifacts, dir)
    }

    pub fn save_reports_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<(), WebGenError> {
        save_artifacts_to_dir(&self.reports, dir)
    }
}

/// Writes each artifact to `dir/<file name>`, creating `dir` if needed.
pub fn save_artifacts_to_dir<P: AsRef<Path>>(artifacts: &[Artifact], dir: P) -> Result<(), WebGenError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to create '{}': {}", dir.display(), e))
    })?;
    for artifact in artifacts {
        let path = dir.join(artifact.file_name());
        fs::write(&path, artifact.content()).map_err(|e| {
            io::Error::new(e.kind(), format!("Failed to write '{}': {}", path.display(), e))
        })?;
        log::info!("Wrote {}", path.display());
    }
    Ok(())
}
