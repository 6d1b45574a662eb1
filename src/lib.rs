//! sheetseed - Seed database tables from spreadsheet workbooks
//!
//! Reads a workbook (xlsx, xls, ods, csv), turns every visible sheet into an
//! ordered batch of row inserts for the table of the same name, and hands the
//! batches to a [`Destination`] that performs the actual writes.
//!
//! ```no_run
//! use sheetseed::{generator::sequence, import_with, Operation, SqlScript};
//!
//! let import = import_with("fixtures/users.xlsx", |builder| {
//!     Ok(builder
//!         .exclude(["audit_log"])
//!         .with_generated_value("users", "id", sequence().starting_at(100)))
//! })?;
//!
//! let mut script = SqlScript::new();
//! import.execute(&mut script)?;
//! # Ok::<(), sheetseed::ImportError>(())
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod import;
pub mod model;
pub mod operation;
pub mod resource;
pub mod setup;
pub mod sql;
pub mod source;

pub use config::ImportConfig;
pub use error::{ImportError, Result};
pub use import::{excel, import_from, import_with, Import, ImportBuilder};
pub use model::{Insert, Value};
pub use operation::{Destination, Operation, Recorder};
pub use resource::ResourceRoots;
pub use setup::DbSetup;
pub use sql::SqlScript;
