pub mod ids;
pub mod registry;

pub use ids::{EMPTY_ID, HtmlId, normalize_id, remove_diacritics};
pub use registry::IdRegistry;
