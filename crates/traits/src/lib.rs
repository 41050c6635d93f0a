pub mod resource;
pub mod template;

pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedText};
pub use template::{
    DEFAULT_TEMPLATE_EXTENSION, Replacements, TemplateError, TemplateProvider, apply_replacements,
    trim_final_line_break,
};
