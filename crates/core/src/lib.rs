//! # webgen-core
//!
//! The artifact-resolution engine.
//!
//! - **component**: parses one specification line into a `Component`
//! - **dictionary**: per-field behavior for generated input fields
//! - **binding**: maps components to rows and values in the data tree
//! - **expand**: template expansion, including nested row/item templates
//! - **output**: the output tree and the context stack that places fragments in it
//! - **artifact**: per-artifact ids, counters and the finished `Artifact`
//! - **cleanup**: automenu and the passes run over finished artifacts
//! - **generator**: the driver, the report pass and persistence
//!
//! ## Design Principle
//!
//! Generation is a synchronous batch transform. Template lookup and data
//! are injected, so the same inputs always produce the same artifacts.

// Re-export foundation crates
pub use webgen_resource as resource;
pub use webgen_source as source;
pub use webgen_traits as traits;
pub use webgen_types as types;

pub mod artifact;
pub mod binding;
pub mod cleanup;
pub mod component;
pub mod dictionary;
pub mod error;
pub mod expand;
pub mod generator;
pub mod output;
pub mod policy;
pub mod report;

pub use artifact::{Artifact, ArtifactBuilder};
pub use component::{Component, ComponentParser, DataSource, Parameter};
pub use dictionary::DataDictionary;
pub use error::WebGenError;
pub use expand::Engine;
pub use generator::{Generation, Generator, GeneratorBuilder, save_artifacts_to_dir};
pub use output::{ContextStack, Fragment, OutputTree};
pub use policy::InputPolicy;
pub use report::DEFAULT_REPORT_TITLE;
