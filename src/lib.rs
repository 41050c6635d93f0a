//! # webgen
//!
//! Generates static web pages from a wiki-style specification.
//!
//! ```text
//! == Main page
//! {section Welcome}
//! * {action Contact}
//! {table Opening hours|Day|Hours}
//! == Contact
//! {form Write to us|Name|Email|Message}
//! ```
//!
//! Each `== Title` line starts a page. Every `{type title|parameters}`
//! directive is expanded with the template of that type, nested by its
//! leading `*`/`#` markers, and filled from optional XML data. A report
//! page listing every page's data inputs and outputs is generated last.

pub mod config;

pub use config::GeneratorConfig;
pub use webgen_core::{
    Artifact, Component, ComponentParser, DataDictionary, DataSource, Generation, Generator,
    GeneratorBuilder, InputPolicy, WebGenError, save_artifacts_to_dir,
};
pub use webgen_resource::TemplateFinder;
pub use webgen_source::DataTree;
pub use webgen_traits::{Replacements, TemplateProvider};
pub use webgen_types::{HtmlId, IdRegistry, normalize_id};
