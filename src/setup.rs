//! A setup pipeline that runs registered operations in order

use tracing::debug;

use crate::error::Result;
use crate::import::{Import, ImportBuilder};
use crate::operation::{Destination, Operation};

/// Ordered list of operations launched against one destination
#[derive(Default)]
pub struct DbSetup {
    operations: Vec<Box<dyn Operation>>,
}

impl DbSetup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register any operation
    pub fn add(mut self, operation: impl Operation + 'static) -> Self {
        self.operations.push(Box::new(operation));
        self
    }

    /// Register an import of the workbook at `location` with default settings
    pub fn excel(self, location: &str) -> Result<Self> {
        let import = ImportBuilder::excel(location)?.build()?;
        Ok(self.add(import))
    }

    /// Register an import of the workbook at `location`, configured by
    /// `configure`
    pub fn excel_with<F>(self, location: &str, configure: F) -> Result<Self>
    where
        F: FnOnce(ImportBuilder) -> Result<ImportBuilder>,
    {
        let import: Import = configure(ImportBuilder::excel(location)?)?.build()?;
        Ok(self.add(import))
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Execute every operation in registration order, stopping at the first
    /// failure
    pub fn launch(&self, destination: &mut dyn Destination) -> Result<()> {
        for (i, operation) in self.operations.iter().enumerate() {
            debug!(operation = i, "executing setup operation");
            operation.execute(destination)?;
        }
        Ok(())
    }
}
