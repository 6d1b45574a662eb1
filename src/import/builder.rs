//! Builder collecting overrides and exclusions before an import is built

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::config::ImportConfig;
use crate::error::{ImportError, Result};
use crate::generator::ValueGenerator;
use crate::model::{Insert, Value, Workbook};
use crate::resource::ResourceRoots;
use crate::source::SourceFactory;

use super::sheet::{header, rows};
use super::Import;

type TableNameFn = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// How a column's value is produced instead of the cell's own value
pub enum ColumnOverride {
    /// One generated value per row, in row order
    Generated(Box<dyn ValueGenerator>),
    /// The same value in every row
    Constant(Value),
}

impl ColumnOverride {
    fn next_value(&mut self) -> Value {
        match self {
            ColumnOverride::Generated(generator) => generator.next_value(),
            ColumnOverride::Constant(value) => value.clone(),
        }
    }
}

impl fmt::Debug for ColumnOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnOverride::Generated(_) => f.write_str("Generated(..)"),
            ColumnOverride::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
        }
    }
}

/// Collects the configuration of one import
///
/// The workbook location is resolved when the builder is created, so a
/// missing file fails before any configuration happens. Nothing is read
/// until [`ImportBuilder::build`], which consumes the builder.
pub struct ImportBuilder {
    location: String,
    path: PathBuf,
    config: ImportConfig,
    overrides: IndexMap<String, IndexMap<String, ColumnOverride>>,
    table_name: Option<TableNameFn>,
}

impl fmt::Debug for ImportBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportBuilder")
            .field("location", &self.location)
            .field("path", &self.path)
            .field("config", &self.config)
            .field("overrides", &self.overrides)
            .field("table_name", &self.table_name.is_some())
            .finish()
    }
}

impl ImportBuilder {
    /// Start an import of the workbook at `location`, relative to the
    /// current directory
    pub fn excel(location: &str) -> Result<Self> {
        Self::excel_in(&ResourceRoots::default(), location)
    }

    /// Start an import of the workbook at `location`, searched in `roots`
    pub fn excel_in(roots: &ResourceRoots, location: &str) -> Result<Self> {
        let path = roots.resolve(location)?;
        Ok(Self {
            location: location.to_string(),
            path,
            config: ImportConfig::default(),
            overrides: IndexMap::new(),
            table_name: None,
        })
    }

    /// Replace the reader settings wholesale
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// 0-based row index of the header row (default 0)
    pub fn top(mut self, top: usize) -> Self {
        self.config = self.config.with_top(top);
        self
    }

    /// 0-based column index of the first column (default 0)
    pub fn left(mut self, left: usize) -> Self {
        self.config = self.config.with_left(left);
        self
    }

    /// Skip tables by exact name
    pub fn exclude<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.with_excluded_tables(tables);
        self
    }

    /// Skip tables whose whole name matches `pattern`
    pub fn exclude_matching(mut self, pattern: &str) -> Result<Self> {
        self.config = self.config.with_exclude(pattern)?;
        Ok(self)
    }

    /// Import only tables whose whole name matches one of the given patterns
    pub fn include_matching(mut self, pattern: &str) -> Result<Self> {
        self.config = self.config.with_include(pattern)?;
        Ok(self)
    }

    /// Map sheet names to table names; `None` means the sheet cannot be mapped
    pub fn table_name<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.table_name = Some(Box::new(mapper));
        self
    }

    /// Fill `column` of `table` with generated values. A later registration
    /// for the same column replaces this one.
    pub fn with_generated_value<G>(self, table: &str, column: &str, generator: G) -> Self
    where
        G: ValueGenerator + 'static,
    {
        self.with_override(table, column, ColumnOverride::Generated(Box::new(generator)))
    }

    /// Fill `column` of `table` with a constant. A later registration for the
    /// same column replaces this one.
    pub fn with_default_value(self, table: &str, column: &str, value: impl Into<Value>) -> Self {
        self.with_override(table, column, ColumnOverride::Constant(value.into()))
    }

    fn with_override(mut self, table: &str, column: &str, column_override: ColumnOverride) -> Self {
        self.overrides
            .entry(table.to_string())
            .or_default()
            .insert(column.to_string(), column_override);
        self
    }

    /// Read the workbook and build the import
    pub fn build(self) -> Result<Import> {
        let workbook = SourceFactory::new().read(&self.path)?;
        let location = self.location.clone();
        let inserts = self.into_inserts(&workbook)?;

        info!(
            location = %location,
            tables = inserts.len(),
            rows = inserts.iter().map(Insert::row_count).sum::<usize>(),
            "built spreadsheet import"
        );
        Ok(Import::new(location, inserts))
    }

    fn resolve_table(&self, sheet_name: &str) -> Result<String> {
        let resolved = match &self.table_name {
            Some(mapper) => mapper(sheet_name),
            None => Some(sheet_name.to_string()),
        };
        resolved.ok_or_else(|| {
            ImportError::config(format!("could not resolve table name: {}", sheet_name))
        })
    }

    /// Take the overrides of `table` and pair each with its column index
    fn bind_overrides(
        &mut self,
        table: &str,
        columns: &[String],
    ) -> Result<Vec<(usize, ColumnOverride)>> {
        let overrides = self.overrides.shift_remove(table).unwrap_or_default();
        overrides
            .into_iter()
            .map(|(column, column_override)| {
                let idx = columns.iter().position(|c| *c == column).ok_or_else(|| {
                    ImportError::config(format!("column {} not found in table {}", column, table))
                })?;
                Ok((idx, column_override))
            })
            .collect()
    }

    fn into_inserts(mut self, workbook: &Workbook) -> Result<Vec<Insert>> {
        let (top, left) = (self.config.top, self.config.left);
        let mut known = FxHashSet::default();
        let mut imported = FxHashSet::default();
        let mut inserts = Vec::with_capacity(workbook.sheets.len());

        for sheet in &workbook.sheets {
            if !sheet.is_visible() {
                debug!(sheet = sheet.name(), "skipping hidden sheet");
                continue;
            }

            let table = self.resolve_table(sheet.name())?;
            known.insert(table.clone());
            if self.config.is_excluded(&table) {
                debug!(sheet = sheet.name(), table = %table, "skipping excluded table");
                if self.overrides.contains_key(&table) {
                    let columns = header(sheet, top, left)?;
                    self.bind_overrides(&table, &columns)?;
                }
                continue;
            }
            if !imported.insert(table.clone()) {
                return Err(ImportError::config(format!(
                    "duplicate table name: {} (sheet {})",
                    table,
                    sheet.name()
                )));
            }

            let columns = header(sheet, top, left)?;
            let mut bindings = self.bind_overrides(&table, &columns)?;

            let mut insert = Insert::new(table, columns);
            for mut values in rows(sheet, top, left, insert.columns().len())? {
                for (idx, column_override) in bindings.iter_mut() {
                    values[*idx] = column_override.next_value();
                }
                insert.add_row(values);
            }

            debug!(
                sheet = sheet.name(),
                table = insert.table(),
                rows = insert.row_count(),
                "read sheet"
            );
            inserts.push(insert);
        }

        if let Some(table) = self.overrides.keys().find(|t| !known.contains(t.as_str())) {
            return Err(ImportError::config(format!(
                "table not found in workbook: {}",
                table
            )));
        }

        Ok(inserts)
    }
}
