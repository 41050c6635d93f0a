//! Defines the error type for every generation operation.

use thiserror::Error;
use webgen_source::DataError;
use webgen_traits::TemplateError;

/// The main error enum for all high-level operations within the engine.
///
/// Every variant is fatal for the run. Missing data is never reported here:
/// absent rows, fields and attributes resolve to empty text instead.
#[derive(Error, Debug)]
pub enum WebGenError {
    #[error("Template not found: '{name}'")]
    TemplateNotFound { name: String },
    #[error("Template error: {0}")]
    Template(TemplateError),
    #[error("Invalid data locator '{locator}': {message}")]
    Locator { locator: String, message: String },
    #[error("Data source error: {0}")]
    Data(#[from] DataError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<TemplateError> for WebGenError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::NotFound(name) => WebGenError::TemplateNotFound { name },
            other => WebGenError::Template(other),
        }
    }
}
