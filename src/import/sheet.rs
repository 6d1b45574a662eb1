//! Reading the header and data rows of one sheet

use rustc_hash::FxHashSet;

use crate::error::{ImportError, Result};
use crate::model::{RawCell, Sheet, Value};

/// Column names from the header row at `top`, starting at `left`
///
/// The header extends to the last non-empty cell of the row. Every cell in
/// between must hold a non-blank string.
pub(crate) fn header(sheet: &Sheet, top: usize, left: usize) -> Result<Vec<String>> {
    let not_found =
        || ImportError::parse(format!("header row not found: {}[{}]", sheet.name(), top));

    let last = sheet.last_column(top).ok_or_else(not_found)?;
    if last < left {
        return Err(not_found());
    }

    let mut seen = FxHashSet::default();
    let mut columns = Vec::with_capacity(last - left + 1);
    for col in left..=last {
        let name = match sheet.cell(top, col) {
            RawCell::Value(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            RawCell::Empty | RawCell::Value(Value::Null) | RawCell::Value(Value::String(_)) => {
                return Err(ImportError::parse(format!(
                    "header cell must not be blank: {}",
                    sheet.a1(top, col)
                )));
            }
            RawCell::Value(_) => {
                return Err(ImportError::parse(format!(
                    "header cell must be string type: {}",
                    sheet.a1(top, col)
                )));
            }
            RawCell::Error(_) => return Err(error_value(sheet, top, col)),
        };
        if !seen.insert(name.clone()) {
            return Err(ImportError::parse(format!(
                "duplicate header column {:?}: {}",
                name,
                sheet.a1(top, col)
            )));
        }
        columns.push(name);
    }

    Ok(columns)
}

/// Data rows below the header, in file order
///
/// Reading stops at the first row whose cells under the header are all
/// empty, or at the end of the sheet.
pub(crate) fn rows(
    sheet: &Sheet,
    top: usize,
    left: usize,
    width: usize,
) -> Result<Vec<Vec<Value>>> {
    let mut rows = Vec::new();

    for row in (top + 1)..sheet.row_count() {
        let window = left..left + width;
        if window.clone().all(|col| sheet.cell(row, col).is_empty()) {
            break;
        }

        let values = window
            .map(|col| match sheet.cell(row, col) {
                RawCell::Empty => Ok(Value::Null),
                RawCell::Value(v) => Ok(v.clone()),
                RawCell::Error(_) => Err(error_value(sheet, row, col)),
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(values);
    }

    Ok(rows)
}

fn error_value(sheet: &Sheet, row: usize, col: usize) -> ImportError {
    ImportError::parse(format!("error value contained: {}", sheet.a1(row, col)))
}
