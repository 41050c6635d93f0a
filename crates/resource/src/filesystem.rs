//! Filesystem-based resource provider for template overrides.
//!
//! Templates found below the override directory shadow the bundled
//! defaults. Template names come straight from specification markup, so
//! every resolved path is checked to stay within the base directory.

use webgen_traits::{ResourceError, ResourceProvider, SharedText};
use std::path::{Path, PathBuf};

/// A resource provider that loads text files from the local filesystem.
///
/// # Security
///
/// Paths are canonicalized and must remain within the base directory.
/// Attempts to access files outside the base path return `NotFound`.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    base_path: PathBuf,
    /// Canonicalized base path for security checks
    canonical_base: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    /// Creates a provider rooted at `base_path`. The directory does not need
    /// to exist; a missing directory simply contains no overrides.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        let base = base_path.as_ref().to_path_buf();
        let canonical = base.canonicalize().ok();
        Self {
            base_path: base,
            canonical_base: canonical,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    /// Returns `None` if the path would escape the base directory.
    fn resolve_path_safe(&self, path: &str) -> Option<PathBuf> {
        if Path::new(path).is_absolute() {
            return None;
        }

        let full_path = self.base_path.join(path);

        if let Ok(canonical) = full_path.canonicalize()
            && let Some(ref base) = self.canonical_base
        {
            return canonical.starts_with(base).then_some(canonical);
        }

        // File doesn't exist (yet): reject obvious traversal like "../../x"
        let escapes = Path::new(path)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));
        (!escapes).then_some(full_path)
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedText, ResourceError> {
        let full_path = self
            .resolve_path_safe(path)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (path traversal blocked)", path)))?;

        std::fs::read_to_string(&full_path)
            .map(SharedText::from)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ResourceError::NotFound(path.to_string()),
                std::io::ErrorKind::InvalidData => ResourceError::InvalidEncoding(path.to_string()),
                _ => ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                },
            })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve_path_safe(path)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn base_path(&self) -> Option<&str> {
        self.base_path.to_str()
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
