//! Importing workbooks into insert batches
//!
//! Each visible, non-excluded sheet becomes one [`Insert`] for the table of
//! the same name. The header row gives the column names; the rows below it
//! are read in file order until the first empty row.

mod builder;
mod sheet;

use serde::Serialize;

use crate::error::Result;
use crate::model::Insert;
use crate::operation::{Destination, Operation};

pub use builder::{ColumnOverride, ImportBuilder};

/// Start configuring an import of the workbook at `location`
///
/// # Errors
///
/// Returns `ResourceNotFound` if the file does not exist.
pub fn excel(location: &str) -> Result<ImportBuilder> {
    ImportBuilder::excel(location)
}

/// Import a workbook with default settings
pub fn import_from(location: &str) -> Result<Import> {
    ImportBuilder::excel(location)?.build()
}

/// Import a workbook, letting `configure` adjust the builder first
pub fn import_with<F>(location: &str, configure: F) -> Result<Import>
where
    F: FnOnce(ImportBuilder) -> Result<ImportBuilder>,
{
    configure(ImportBuilder::excel(location)?)?.build()
}

/// A finished import: one insert batch per imported sheet, in sheet order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Import {
    location: String,
    inserts: Vec<Insert>,
}

impl Import {
    pub(crate) fn new(location: String, inserts: Vec<Insert>) -> Self {
        Self { location, inserts }
    }

    /// The location the workbook was requested by
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn inserts(&self) -> &[Insert] {
        &self.inserts
    }

    /// The batch for one table, if it was imported
    pub fn insert_for(&self, table: &str) -> Option<&Insert> {
        self.inserts.iter().find(|i| i.table() == table)
    }

    /// Imported table names, in sheet order
    pub fn tables(&self) -> Vec<&str> {
        self.inserts.iter().map(Insert::table).collect()
    }

    /// Total number of rows across all batches
    pub fn row_count(&self) -> usize {
        self.inserts.iter().map(Insert::row_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
    }

    /// Pretty-printed JSON of the batches
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Operation for Import {
    fn execute(&self, destination: &mut dyn Destination) -> Result<()> {
        for insert in &self.inserts {
            insert.execute(destination)?;
        }
        Ok(())
    }
}
