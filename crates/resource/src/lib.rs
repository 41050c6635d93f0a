//! Template providers for the webgen pipeline.
//!
//! ## Available Providers
//!
//! - [`FilesystemResourceProvider`]: override templates from a local directory
//! - [`bundled_templates`]: the default template set compiled into the binary
//! - [`TemplateFinder`]: the layered lookup the engine talks to
//!
//! ## Re-exports
//!
//! - [`InMemoryResourceProvider`]: pre-populated in-memory storage

mod bundled;
mod filesystem;
mod finder;

pub use bundled::bundled_templates;
pub use filesystem::FilesystemResourceProvider;
pub use finder::TemplateFinder;

pub use webgen_traits::InMemoryResourceProvider;
