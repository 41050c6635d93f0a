//! ResourceProvider trait for abstracting where template text comes from.
//!
//! Templates can be overridden from a directory on disk and otherwise fall
//! back to the defaults compiled into the binary. Both sources are hidden
//! behind this trait so the engine never touches `std::fs` directly.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Resource '{0}' is not valid UTF-8 text")]
    InvalidEncoding(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource text (reference-counted).
pub type SharedText = Arc<str>;

/// A source of named text resources.
///
/// # Implementations
///
/// - `FilesystemResourceProvider`: files below an override directory
/// - `InMemoryResourceProvider`: pre-populated memory (bundled defaults, tests)
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its file name.
    fn load(&self, path: &str) -> Result<SharedText, ResourceError>;

    /// Check if a resource exists.
    fn exists(&self, path: &str) -> bool;

    /// Get the base path for resolving relative resources.
    ///
    /// Returns `None` if the provider doesn't use path-based resolution.
    fn base_path(&self) -> Option<&str> {
        None
    }

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory resource provider.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedText>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a provider from a static table of `(file name, text)` pairs.
    pub fn from_static(entries: &[(&str, &str)]) -> Self {
        let resources = entries
            .iter()
            .map(|(path, text)| (path.to_string(), SharedText::from(*text)))
            .collect();
        Self {
            resources: RwLock::new(resources),
        }
    }

    /// Add a resource to the in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, text: impl Into<SharedText>) -> Result<(), ResourceError> {
        let path_string = path.into();
        let mut resources = self
            .resources
            .write()
            .map_err(|_| ResourceError::LoadFailed {
                path: path_string.clone(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources.insert(path_string, text.into());
        Ok(())
    }

    /// Remove a resource from the store.
    ///
    /// Returns `None` if the lock is poisoned or the resource doesn't exist.
    pub fn remove(&self, path: &str) -> Option<SharedText> {
        self.resources.write().ok()?.remove(path)
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().map(|r| r.is_empty()).unwrap_or(true)
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedText, ResourceError> {
        let resources = self
            .resources
            .read()
            .map_err(|_| ResourceError::LoadFailed {
                path: path.to_string(),
                message: "resource store lock poisoned".to_string(),
            })?;
        resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
