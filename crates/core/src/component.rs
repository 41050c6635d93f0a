//! Component Parser: turns one specification line into a [`Component`].
//!
//! A directive line looks like
//!
//! ```text
//! ** {select(XML=countries.xml)(class=wide) Country|Sweden|Norway} | Denmark
//! ```
//!
//! Everything before the last `{` is ignored. Inside the braces the text
//! up to the first `|` names the type, carries parenthesized `key=value`
//! overrides and ends with the title. Whatever follows is split on `|`
//! into parameters, both inside and after the braces.

use crate::error::WebGenError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use webgen_source::DataTree;
use webgen_traits::Replacements;

/// Component type used for lines without a directive.
pub const DEFAULT_COMPONENT_TYPE: &str = "_default";

/// Override key that designates an embedded data source.
pub const EMBEDDED_DATA_KEY: &str = "XML";

const VARIANT_SEPARATOR: &str = "::";
const LEADING_MARKERS: [char; 4] = [' ', '\t', '*', '#'];

static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*\{([^}]+)\}(.*)$").expect("directive pattern is valid"));

static OVERRIDE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][\w-]*=[^\s=]*$").expect("override pattern is valid"));

/// Where a component reads its data from.
#[derive(Debug, Clone, Default)]
pub enum DataSource {
    /// The data tree supplied to the generator, if any.
    #[default]
    Ambient,
    /// A tree loaded from the component's own `XML=` locator.
    Embedded(Arc<DataTree>),
}

impl DataSource {
    pub fn embedded(&self) -> Option<&DataTree> {
        match self {
            DataSource::Ambient => None,
            DataSource::Embedded(tree) => Some(tree),
        }
    }
}

/// One `|`-separated parameter of a directive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameter {
    raw: String,
    name: String,
    variant: Option<String>,
    overrides: Replacements,
}

impl Parameter {
    /// Parses `(key=value, ...) Name::variant`; both decorations are optional.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut overrides = Replacements::new();
        let mut rest = raw;

        if rest.starts_with('(')
            && let Some(close) = rest.rfind(')')
        {
            parse_override_groups(&rest[..=close], &mut overrides);
            rest = rest[close + 1..].trim();
        }

        let (name, variant) = match rest.split_once(VARIANT_SEPARATOR) {
            Some((name, variant)) => {
                let variant = variant.trim().replace(VARIANT_SEPARATOR, "-");
                (name.trim(), (!variant.is_empty()).then_some(variant))
            }
            None => (rest, None),
        };

        Self {
            raw: raw.to_string(),
            name: name.to_string(),
            variant,
            overrides,
        }
    }

    /// The parameter exactly as written, used for generic content passthrough.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Display name with overrides and variant removed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// The variant as a style hook, empty when there is none.
    pub fn style(&self) -> &str {
        self.variant.as_deref().unwrap_or("")
    }

    pub fn overrides(&self) -> &Replacements {
        &self.overrides
    }
}

/// The structured interpretation of one specification line.
#[derive(Debug, Clone, Default)]
pub struct Component {
    component_type: String,
    title: String,
    overrides: Replacements,
    data: DataSource,
    parameters: Vec<Parameter>,
}

impl Component {
    pub fn new(component_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// A passthrough component carrying the line, minus leading list markers.
    pub fn generic(line: &str) -> Self {
        let text = line.trim_start_matches(LEADING_MARKERS);
        Self::new(DEFAULT_COMPONENT_TYPE, "").with_parameters(split_parameters(text))
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    pub fn with_data(mut self, data: DataSource) -> Self {
        self.data = data;
        self
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn overrides(&self) -> &Replacements {
        &self.overrides
    }

    pub fn data(&self) -> &DataSource {
        &self.data
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn is_generic(&self) -> bool {
        self.component_type == DEFAULT_COMPONENT_TYPE
    }
}

/// Parses specification lines. Relative `XML=` locators resolve against
/// the base directory when one is set.
#[derive(Debug, Clone, Default)]
pub struct ComponentParser {
    base_dir: Option<PathBuf>,
}

impl ComponentParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    /// Parses a full line. Lines without a directive become generic content.
    pub fn parse(&self, line: &str) -> Result<Component, WebGenError> {
        match DIRECTIVE_RE.captures(line) {
            Some(caps) => {
                let body = caps.get(1).map_or("", |m| m.as_str());
                let trailing = caps.get(2).map_or("", |m| m.as_str());
                self.parse_directive(body, trailing)
            }
            None => Ok(Component::generic(line)),
        }
    }

    /// Parses the text between the braces plus whatever followed them.
    pub fn parse_directive(&self, body: &str, trailing: &str) -> Result<Component, WebGenError> {
        let (head, inner_params) = match body.split_once('|') {
            Some((head, rest)) => (head.trim(), rest),
            None => (body.trim(), ""),
        };

        let mut overrides = Replacements::new();
        let mut locator = None;

        let type_end = head.find(char::is_whitespace).unwrap_or(head.len());
        let (component_type, title) = match head[..type_end].find('(') {
            Some(open) => {
                let close = open + override_groups_len(&head[open..]);
                locator = parse_override_groups(&head[open..close], &mut overrides);
                (head[..open].trim(), head[close..].trim())
            }
            None => (&head[..type_end], head[type_end..].trim()),
        };

        let (title, trailing_locator) = split_trailing_overrides(title, &mut overrides);
        let locator = locator.or(trailing_locator);

        let component_type = if component_type.is_empty() {
            DEFAULT_COMPONENT_TYPE
        } else {
            component_type
        };

        let mut parameters = split_parameters(inner_params);
        parameters.extend(split_parameters(trailing));

        let data = match locator {
            Some(locator) => DataSource::Embedded(Arc::new(self.load_embedded(&locator)?)),
            None => DataSource::Ambient,
        };

        Ok(Component {
            component_type: component_type.to_string(),
            title,
            overrides,
            data,
            parameters,
        })
    }

    fn load_embedded(&self, locator: &str) -> Result<DataTree, WebGenError> {
        if locator.is_empty() {
            return Err(WebGenError::Locator {
                locator: String::new(),
                message: "empty locator".to_string(),
            });
        }
        let path = match &self.base_dir {
            Some(base) if Path::new(locator).is_relative() => base.join(locator),
            _ => PathBuf::from(locator),
        };
        log::debug!("Loading embedded data from '{}'", path.display());
        DataTree::load(&path).map_err(|e| WebGenError::Locator {
            locator: locator.to_string(),
            message: e.to_string(),
        })
    }
}

/// Length of the run of `(…)` groups that `text` starts with.
fn override_groups_len(text: &str) -> usize {
    let mut end = 0;
    while text[end..].starts_with('(') {
        match text[end..].find(')') {
            Some(close) => end += close + 1,
            None => return text.len(),
        }
    }
    end
}

/// Reads `(k=v, k2=v2)(k3=v3)` into `overrides` and returns an `XML=` locator if present.
fn parse_override_groups(groups: &str, overrides: &mut Replacements) -> Option<String> {
    let mut locator = None;
    for pair in groups.split(['(', ')']).flat_map(|group| group.split(',')) {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key == EMBEDDED_DATA_KEY {
            locator = Some(value.to_string());
        } else if !key.is_empty() {
            overrides.insert(key.to_string(), value.to_string());
        }
    }
    locator
}

/// Pops trailing `name=value` words off a title.
fn split_trailing_overrides(title: &str, overrides: &mut Replacements) -> (String, Option<String>) {
    let mut words: Vec<&str> = title.split_whitespace().collect();
    let mut trailing = Vec::new();
    while let Some(word) = words.last().copied() {
        if !OVERRIDE_TOKEN_RE.is_match(word) {
            break;
        }
        trailing.push(word);
        words.pop();
    }
    if trailing.is_empty() {
        return (title.to_string(), None);
    }
    let locator = parse_override_groups(&trailing.join(","), overrides);
    (words.join(" "), locator)
}

fn split_parameters(text: &str) -> Vec<Parameter> {
    text.split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(Parameter::parse)
        .collect()
}
