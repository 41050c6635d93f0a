//! Template Expansion Engine.
//!
//! Turns a [`Component`] into a [`Fragment`] of HTML. Substitution is plain
//! text replacement; the only structure is a fixed set of directive
//! placeholders:
//!
//! | placeholder               | replaced by                                         |
//! |---------------------------|-----------------------------------------------------|
//! | `${id}` `${name}` `${title}` | issued id, normalized title, literal title       |
//! | `${header:item@row}`      | `item` once per parameter, wrapped in `row`         |
//! | `${data:item@row}`        | `item` once per field of every bound row            |
//! | `${data}`                 | a single bound value                                |
//! | `${attribute:x}` `${element:x}` | lookups on the field an item was made for     |
//! | `${content}`              | parameters, then nested lines                       |

use crate::artifact::ArtifactBuilder;
use crate::binding::{attribute_of, element_of, field_text, resolve_rows, resolve_scalar, row_fields};
use crate::component::{Component, ComponentParser, Parameter};
use crate::dictionary::DataDictionary;
use crate::error::WebGenError;
use crate::output::{CONTENT_SLOT, Fragment};
use crate::policy::InputPolicy;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use webgen_source::{DataNode, DataTree};
use webgen_traits::{Replacements, TemplateProvider};
use webgen_types::normalize_id;

pub const LINE_BREAK: &str = "\n";

const ID: &str = "${id}";
const NAME: &str = "${name}";
const TITLE: &str = "${title}";
const STYLE: &str = "${style}";
const SCALAR_DATA: &str = "${data}";
const AUTOMENU_PREFIX: &str = "automenu:";

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{header:([^}]+)\}").expect("header pattern is valid"));
static DATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{data:([^}]+)\}").expect("data pattern is valid"));
static ATTRIBUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{attribute:([^}]+)\}").expect("attribute pattern is valid"));
static ELEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{element:([^}]+)\}").expect("element pattern is valid"));
static UNRESOLVED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s?\$\{([^}]*)\}\s?").expect("placeholder pattern is valid"));

/// `item@row` argument of a header or data directive.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Directive {
    item: String,
    row: Option<String>,
}

impl Directive {
    fn parse(spec: &str) -> Self {
        match spec.split_once('@') {
            Some((item, row)) => Self {
                item: item.trim().to_string(),
                row: Some(row.trim().to_string()).filter(|r| !r.is_empty()),
            },
            None => Self {
                item: spec.trim().to_string(),
                row: None,
            },
        }
    }
}

/// Each distinct `(placeholder, argument)` pair matched by `re`, in order.
fn directives(re: &Regex, content: &str) -> Vec<(String, String)> {
    re.captures_iter(content)
        .map(|caps| (caps[0].to_string(), caps[1].to_string()))
        .unique()
        .collect()
}

fn substitute_metadata(text: &str, id: &str, title: &str) -> String {
    text.replace(ID, id)
        .replace(NAME, &normalize_id(title))
        .replace(TITLE, title)
}

/// Escapes a value for use inside a double-quoted attribute.
pub fn quote(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Removes placeholders that were never substituted, with one whitespace
/// character on either side. `${automenu:...}` survives until every
/// artifact is known.
pub fn strip_unresolved(text: &str) -> String {
    UNRESOLVED_RE
        .replace_all(text, |caps: &Captures<'_>| {
            if caps[1].starts_with(AUTOMENU_PREFIX) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Parameters as literal lines.
fn generic_content(component: &Component) -> String {
    component
        .parameters()
        .iter()
        .map(|p| format!("{}{}", p.raw(), LINE_BREAK))
        .collect()
}

/// Expands components against a template provider.
///
/// All collaborators are borrowed, so one engine serves a whole generation
/// run and nothing is shared beyond it.
pub struct Engine<'a> {
    templates: &'a dyn TemplateProvider,
    dictionary: &'a DataDictionary,
    parser: &'a ComponentParser,
    policy: &'a InputPolicy,
    data: Option<&'a DataTree>,
}

impl<'a> Engine<'a> {
    pub fn new(
        templates: &'a dyn TemplateProvider,
        dictionary: &'a DataDictionary,
        parser: &'a ComponentParser,
        policy: &'a InputPolicy,
        data: Option<&'a DataTree>,
    ) -> Self {
        Self {
            templates,
            dictionary,
            parser,
            policy,
            data,
        }
    }

    /// Expands one component for `artifact`.
    ///
    /// The returned fragment ends with a line break. Parameters are placed in
    /// front of the content slot, leaving the slot open for nested lines.
    pub fn expand(&self, component: &Component, artifact: &mut ArtifactBuilder) -> Result<Fragment, WebGenError> {
        let id = artifact
            .ids_mut()
            .create_component_id(component.component_type(), component.title());
        log::debug!(
            "Expanding {} '{}' as #{}",
            component.component_type(),
            component.title(),
            id
        );

        let template = self
            .templates
            .get(component.component_type(), Some(component.overrides()))?;
        // split before substituting so bound values can never open a slot
        let raw = Fragment::from_template(&template);
        let resolve = |text: &str, artifact: &mut ArtifactBuilder| -> Result<String, WebGenError> {
            let text = substitute_metadata(text, id.as_str(), component.title());
            let text = self.resolve_headers(&text, component, artifact)?;
            self.resolve_data(&text, id.as_str(), component, artifact)
        };
        let head = resolve(raw.head(), artifact)?;
        let mut fragment = match raw.tail() {
            Some(tail) => Fragment::with_slot(head, resolve(tail, artifact)?),
            None => Fragment::leaf(head),
        };
        if fragment.has_slot() {
            let parameters = if self.policy.is_form(&template) {
                self.input_fields(component, artifact)?
            } else {
                generic_content(component)
            };
            fragment.push_before_slot(&parameters);
        }
        fragment.push_str(LINE_BREAK);
        Ok(fragment.map_text(strip_unresolved))
    }

    fn resolve_headers(
        &self,
        content: &str,
        component: &Component,
        artifact: &mut ArtifactBuilder,
    ) -> Result<String, WebGenError> {
        let mut content = content.to_string();
        for (placeholder, spec) in directives(&HEADER_RE, &content) {
            let directive = Directive::parse(&spec);
            let mut items = String::new();
            for parameter in component.parameters() {
                items.push_str(&self.header_item(&directive.item, parameter, artifact)?);
            }
            let block = self.wrap_row(directive.row.as_deref(), &items)?;
            content = content.replace(&placeholder, &block);
        }
        Ok(content)
    }

    /// One header cell. A `::variant` picks `item-variant` when that template exists.
    fn header_item(
        &self,
        item: &str,
        parameter: &Parameter,
        artifact: &mut ArtifactBuilder,
    ) -> Result<String, WebGenError> {
        let name = match parameter.variant() {
            Some(variant) if self.templates.exists(&format!("{item}-{variant}")) => {
                format!("{item}-{variant}")
            }
            _ => item.to_string(),
        };
        let text = self
            .templates
            .get(&name, Some(parameter.overrides()))?
            .replace(STYLE, parameter.style());
        Ok(instantiate_item(text, parameter.name(), artifact))
    }

    fn resolve_data(
        &self,
        content: &str,
        id: &str,
        component: &Component,
        artifact: &mut ArtifactBuilder,
    ) -> Result<String, WebGenError> {
        let mut content = content.to_string();

        if content.contains(SCALAR_DATA) {
            let value = resolve_scalar(self.data, component, artifact.title(), id);
            artifact.count_outputs(1);
            content = content.replace(SCALAR_DATA, &value);
        }

        for (placeholder, spec) in directives(&DATA_RE, &content) {
            let directive = Directive::parse(&spec);
            artifact.count_outputs(component.parameters().len().max(1));

            let rows = resolve_rows(self.data, component, artifact.title(), id);
            log::debug!("Bound {} rows to #{}", rows.len(), id);
            if rows.is_empty() {
                content = content.replace(&placeholder, "");
                continue;
            }

            let item_template = self.templates.get(&directive.item, None)?;
            let mut rendered = Vec::with_capacity(rows.len());
            for row in rows {
                let mut cells = String::new();
                for field in row_fields(row, component.parameters()) {
                    cells.push_str(&data_item(&item_template, field, artifact));
                }
                rendered.push(self.wrap_row(directive.row.as_deref(), &cells)?);
            }
            content = content.replace(&placeholder, &rendered.join(LINE_BREAK));
        }
        Ok(content)
    }

    fn wrap_row(&self, row: Option<&str>, inner: &str) -> Result<String, WebGenError> {
        match row {
            Some(row) => Ok(self.templates.get(row, None)?.replace(CONTENT_SLOT, inner)),
            None => Ok(inner.to_string()),
        }
    }

    /// One generated input per parameter, each followed by a line break.
    fn input_fields(&self, component: &Component, artifact: &mut ArtifactBuilder) -> Result<String, WebGenError> {
        let mut out = String::new();
        for parameter in component.parameters() {
            out.push_str(&self.input_field(parameter, artifact)?);
            out.push_str(LINE_BREAK);
        }
        Ok(out)
    }

    /// Expands a parameter as its own component, using the dictionary's
    /// `input` directive for that field.
    fn input_field(&self, parameter: &Parameter, artifact: &mut ArtifactBuilder) -> Result<String, WebGenError> {
        artifact.count_input();
        let title = parameter.name();
        let input = self.dictionary.input(title);
        let field = parameter
            .overrides()
            .iter()
            .fold(self.parser.parse_directive(&format!("{input} {title}"), "")?, |c, (k, v)| {
                c.with_override(k.as_str(), v.as_str())
            });

        let id = artifact.ids_mut().create_id(title);
        log::debug!("Input field '{}' as {} #{}", title, field.component_type(), id);

        let mut replacements = Replacements::new();
        replacements.insert("description".to_string(), quote(self.dictionary.description(title)));
        replacements.insert("placeholder".to_string(), quote(self.dictionary.placeholder(title)));
        replacements.insert("value".to_string(), String::new());
        replacements.extend(field.overrides().clone());

        let template = self.templates.get(field.component_type(), Some(&replacements))?;
        let content = substitute_metadata(&template, &quote(id.as_str()), field.title());
        let content = self.resolve_headers(&content, &field, artifact)?;
        let content = self.resolve_data(&content, id.as_str(), &field, artifact)?;
        Ok(strip_unresolved(&content))
    }
}

/// Fills `${id}` (only when present, so no id is wasted) and `${title}`.
fn instantiate_item(text: String, title: &str, artifact: &mut ArtifactBuilder) -> String {
    let text = if text.contains(ID) {
        let id = artifact.ids_mut().create_id(title);
        text.replace(ID, id.as_str())
    } else {
        text
    };
    text.replace(TITLE, title)
}

/// One data cell, with attribute and element references resolved against its field.
fn data_item(template: &str, field: Option<DataNode<'_>>, artifact: &mut ArtifactBuilder) -> String {
    let text = instantiate_item(template.to_string(), &field_text(field), artifact);
    let text = ATTRIBUTE_RE.replace_all(&text, |caps: &Captures<'_>| attribute_of(field, &caps[1]));
    ELEMENT_RE
        .replace_all(&text, |caps: &Captures<'_>| element_of(field, &caps[1]))
        .into_owned()
}
