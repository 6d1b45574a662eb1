//! Executable operations and the destinations that receive them

use crate::error::{ImportError, Result};
use crate::model::Insert;

/// Receives insert batches; the actual database writes happen here
pub trait Destination {
    fn insert(&mut self, insert: &Insert) -> anyhow::Result<()>;
}

/// Something that can be executed against a destination
pub trait Operation: Send + Sync {
    fn execute(&self, destination: &mut dyn Destination) -> Result<()>;
}

impl Operation for Insert {
    fn execute(&self, destination: &mut dyn Destination) -> Result<()> {
        destination
            .insert(self)
            .map_err(|source| ImportError::Execution {
                table: self.table().to_string(),
                source,
            })
    }
}

/// Destination that keeps every batch in memory, in arrival order
#[derive(Debug, Default)]
pub struct Recorder {
    pub inserts: Vec<Insert>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches received for one table
    pub fn for_table<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a Insert> + 'a {
        self.inserts.iter().filter(move |i| i.table() == table)
    }

    /// Total rows received
    pub fn row_count(&self) -> usize {
        self.inserts.iter().map(Insert::row_count).sum()
    }
}

impl Destination for Recorder {
    fn insert(&mut self, insert: &Insert) -> anyhow::Result<()> {
        self.inserts.push(insert.clone());
        Ok(())
    }
}
