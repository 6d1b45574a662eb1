//! CSV source: one file is a single-sheet workbook named after the file stem

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ImportError, Result};
use crate::model::{RawCell, Sheet, Value, Workbook};

use super::WorkbookSource;

/// Source for CSV files
pub struct CsvSource;

impl WorkbookSource for CsvSource {
    fn read(&self, path: &Path) -> Result<Workbook> {
        let file = File::open(path).map_err(|e| ImportError::workbook(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut cells = Vec::new();
        for (line_num, result) in reader.records().enumerate() {
            let record = result
                .map_err(|e| ImportError::workbook(path, format!("row {}: {}", line_num + 1, e)))?;
            cells.push(record.iter().map(parse_cell).collect());
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        Ok(Workbook::new(vec![Sheet::new(name, cells)]))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("csv")
    }
}

/// Parse a field with type inference
fn parse_cell(s: &str) -> RawCell {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return RawCell::Empty;
    }
    if trimmed.eq_ignore_ascii_case("null") {
        return RawCell::Value(Value::Null);
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return RawCell::Value(Value::Bool(true));
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return RawCell::Value(Value::Bool(false));
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return RawCell::Value(Value::Int(i));
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return RawCell::Value(Value::Float(f));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return RawCell::Value(Value::Date(date));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return RawCell::Value(Value::DateTime(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return RawCell::Value(Value::DateTime(dt));
    }

    RawCell::Value(Value::String(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(""), RawCell::Empty);
        assert_eq!(parse_cell("null"), RawCell::Value(Value::Null));
        assert_eq!(parse_cell("true"), RawCell::Value(Value::Bool(true)));
        assert_eq!(parse_cell("42"), RawCell::Value(Value::Int(42)));
        assert_eq!(parse_cell("0.5"), RawCell::Value(Value::Float(0.5)));
        assert_eq!(
            parse_cell("2019-12-01"),
            RawCell::Value(Value::Date(NaiveDate::from_ymd_opt(2019, 12, 1).unwrap()))
        );
        assert_eq!(parse_cell("Alice"), RawCell::Value(Value::from("Alice")));
    }

    #[test]
    fn test_read_uses_file_stem_as_sheet_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table_1.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "id,name").unwrap();
        writeln!(file, "1,Alice").unwrap();
        writeln!(file, "2,").unwrap();
        drop(file);

        let workbook = CsvSource.read(&path).unwrap();
        assert_eq!(workbook.sheets.len(), 1);

        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.name(), "table_1");
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.cell(1, 1), &RawCell::Value(Value::from("Alice")));
        assert!(sheet.cell(2, 1).is_empty());
    }
}
