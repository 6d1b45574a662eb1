//! Reader settings for spreadsheet imports

use indexmap::IndexSet;
use regex::Regex;

use crate::error::{ImportError, Result};

/// Settings that decide where tables start and which ones are imported
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    /// 0-based row index of the header row
    pub top: usize,
    /// 0-based column index of the first column
    pub left: usize,
    /// When non-empty, only tables matching one of these are imported
    pub include: Vec<Regex>,
    /// Tables matching any of these are skipped
    pub exclude: Vec<Regex>,
    /// Table names skipped by exact match
    pub excluded_tables: IndexSet<String>,
}

impl ImportConfig {
    /// Create a config reading from A1 with nothing excluded
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header row index
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Set the first column index
    pub fn with_left(mut self, left: usize) -> Self {
        self.left = left;
        self
    }

    /// Add an inclusion pattern; it must match the whole table name
    pub fn with_include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(anchored(pattern)?);
        Ok(self)
    }

    /// Add an exclusion pattern; it must match the whole table name
    pub fn with_exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(anchored(pattern)?);
        Ok(self)
    }

    /// Exclude tables by exact name
    pub fn with_excluded_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_tables.extend(tables.into_iter().map(Into::into));
        self
    }

    /// Check if a resolved table name is skipped
    pub fn is_excluded(&self, table: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|re| re.is_match(table));
        if !included {
            return true;
        }
        self.excluded_tables.contains(table) || self.exclude.iter().any(|re| re.is_match(table))
    }
}

fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern))
        .map_err(|e| ImportError::config(format!("invalid table pattern {:?}: {}", pattern, e)))
}
