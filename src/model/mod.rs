//! Data model for workbooks and the inserts built from them

mod insert;
pub mod reference;
mod value;
mod workbook;

pub use insert::Insert;
pub use value::Value;
pub use workbook::{RawCell, Sheet, Workbook};
