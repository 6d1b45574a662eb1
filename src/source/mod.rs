//! Workbook sources: read a file into an in-memory `Workbook`

mod csv;
mod excel;

use std::path::Path;

use crate::error::{ImportError, Result};
use crate::model::Workbook;

pub use self::csv::CsvSource;
pub use self::excel::ExcelSource;

/// Trait for reading workbook files
pub trait WorkbookSource: Send + Sync {
    /// Read every sheet of the file at `path`
    fn read(&self, path: &Path) -> Result<Workbook>;

    /// Check if this source can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for picking a source based on file extension
pub struct SourceFactory {
    sources: Vec<Box<dyn WorkbookSource>>,
}

impl Default for SourceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFactory {
    /// Create a factory with all supported sources
    pub fn new() -> Self {
        Self {
            sources: vec![Box::new(ExcelSource), Box::new(CsvSource)],
        }
    }

    /// Get a source for the given file path
    pub fn get_source(&self, path: &Path) -> Result<&dyn WorkbookSource> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        self.sources
            .iter()
            .find(|source| source.supports_extension(&ext))
            .map(|source| source.as_ref())
            .ok_or_else(|| {
                ImportError::parse(format!(
                    "unsupported workbook format: {}",
                    path.display()
                ))
            })
    }

    /// Read a file using the appropriate source
    pub fn read(&self, path: &Path) -> Result<Workbook> {
        self.get_source(path)?.read(path)
    }
}
