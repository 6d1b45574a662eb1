//! Excel workbook source (xlsx, xlsm, xlsb, xls, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader, SheetVisible};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ImportError, Result};
use crate::model::{RawCell, Sheet, Value, Workbook};

use super::WorkbookSource;

/// Source for Excel and OpenDocument files
pub struct ExcelSource;

impl WorkbookSource for ExcelSource {
    fn read(&self, path: &Path) -> Result<Workbook> {
        let mut workbook = open_workbook_auto(path).map_err(|e| ImportError::workbook(path, e))?;

        let metadata: Vec<(String, bool)> = workbook
            .sheets_metadata()
            .iter()
            .map(|s| (s.name.clone(), matches!(s.visible, SheetVisible::Visible)))
            .collect();

        let mut sheets = Vec::with_capacity(metadata.len());
        for (name, visible) in metadata {
            if !visible {
                sheets.push(Sheet::new(name, Vec::new()).with_hidden(true));
                continue;
            }
            let range: Range<Data> = workbook
                .worksheet_range(&name)
                .map_err(|e| ImportError::workbook(path, format!("sheet {}: {}", name, e)))?;
            sheets.push(range_to_sheet(name, &range));
        }

        Ok(Workbook::new(sheets))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(
            ext.to_lowercase().as_str(),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods"
        )
    }
}

/// Keep the used cells of a range at their absolute positions
fn range_to_sheet(name: String, range: &Range<Data>) -> Sheet {
    let (top, left) = range.start().unwrap_or_default();
    let cells = range.used_cells().map(|(r, c, data)| {
        ((top as usize + r, left as usize + c), convert_cell(data))
    });
    Sheet::from_sparse(name, cells)
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Value(Value::String(s.clone())),
        Data::Float(f) => RawCell::Value(number(*f)),
        Data::Int(i) => RawCell::Value(Value::Int(*i)),
        Data::Bool(b) => RawCell::Value(Value::Bool(*b)),
        Data::DateTime(dt) => match date_time(dt) {
            Some(value) => RawCell::Value(value),
            None => RawCell::Error(format!("#DATE({})", dt.as_f64())),
        },
        Data::DateTimeIso(s) => {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                RawCell::Value(Value::DateTime(dt))
            } else if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                RawCell::Value(Value::Date(d))
            } else {
                RawCell::Value(Value::String(s.clone()))
            }
        }
        Data::DurationIso(s) => RawCell::Value(Value::String(s.clone())),
        Data::Error(e) => RawCell::Error(e.to_string()),
    }
}

/// Excel stores every number as a float; integral ones are bound as integers
fn number(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Value::Int(f as i64)
    } else {
        Value::Float(f)
    }
}

/// Date-formatted cell; calamine applies the workbook's 1900 or 1904 epoch
fn date_time(dt: &ExcelDateTime) -> Option<Value> {
    if dt.is_duration() {
        return dt.as_duration().map(|d| Value::String(duration_text(d)));
    }
    let datetime = dt.as_datetime()?;
    if datetime.time() == NaiveTime::MIN {
        Some(Value::Date(datetime.date()))
    } else {
        Some(Value::DateTime(datetime))
    }
}

/// Elapsed time as `[h]:mm:ss`, with milliseconds when present
fn duration_text(d: Duration) -> String {
    let sign = if d < Duration::zero() { "-" } else { "" };
    let ms = d.num_milliseconds().unsigned_abs();
    let (secs, ms) = (ms / 1000, ms % 1000);
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    if ms == 0 {
        format!("{}{}:{:02}:{:02}", sign, h, m, s)
    } else {
        format!("{}{}:{:02}:{:02}.{:03}", sign, h, m, s, ms)
    }
}
