//! Error types for spreadsheet imports

use thiserror::Error;

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Errors that can occur while building or executing an import
#[derive(Debug, Error)]
pub enum ImportError {
    /// The location did not resolve to a readable workbook
    #[error("{0} not found")]
    ResourceNotFound(String),

    /// Invalid overrides, patterns or table mapping
    #[error("{0}")]
    Configuration(String),

    /// Malformed workbook content
    #[error("{0}")]
    Parse(String),

    /// The underlying reader failed to open or read the file
    #[error("failed to open {path}: {message}")]
    Workbook { path: String, message: String },

    /// A destination rejected an insert
    #[error("failed to execute insert into {table}")]
    Execution {
        table: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ImportError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        ImportError::Configuration(message.into())
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        ImportError::Parse(message.into())
    }

    pub(crate) fn workbook(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        ImportError::Workbook {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
