//! Workbook, Sheet and raw cell structures

use std::collections::BTreeMap;

use super::reference;
use super::value::Value;

/// A cell as read from the source file, before it is bound to a column
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawCell {
    #[default]
    Empty,
    Value(Value),
    /// A spreadsheet error such as `#DIV/0!`
    Error(String),
}

impl RawCell {
    /// Check if the cell holds nothing
    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }
}

impl From<Value> for RawCell {
    fn from(v: Value) -> Self {
        RawCell::Value(v)
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::Value(Value::from(s))
    }
}

impl From<i64> for RawCell {
    fn from(i: i64) -> Self {
        RawCell::Value(Value::Int(i))
    }
}

impl From<f64> for RawCell {
    fn from(f: f64) -> Self {
        RawCell::Value(Value::Float(f))
    }
}

impl From<bool> for RawCell {
    fn from(b: bool) -> Self {
        RawCell::Value(Value::Bool(b))
    }
}

static EMPTY: RawCell = RawCell::Empty;

/// A single worksheet; only non-empty cells are stored, keyed by their
/// absolute 0-based position
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    visible: bool,
    rows: BTreeMap<usize, BTreeMap<usize, RawCell>>,
}

impl Sheet {
    /// Create a visible sheet from rows of cells anchored at A1
    pub fn new(name: impl Into<String>, cells: Vec<Vec<RawCell>>) -> Self {
        let cells = cells.into_iter().enumerate().flat_map(|(r, row)| {
            row.into_iter()
                .enumerate()
                .map(move |(c, cell)| ((r, c), cell))
        });
        Self::from_sparse(name, cells)
    }

    /// Create a visible sheet from `(row, column)` positioned cells
    pub fn from_sparse<I>(name: impl Into<String>, cells: I) -> Self
    where
        I: IntoIterator<Item = ((usize, usize), RawCell)>,
    {
        let mut rows: BTreeMap<usize, BTreeMap<usize, RawCell>> = BTreeMap::new();
        for ((row, col), cell) in cells {
            if !cell.is_empty() {
                rows.entry(row).or_default().insert(col, cell);
            }
        }
        Self {
            name: name.into(),
            visible: true,
            rows,
        }
    }

    /// Mark the sheet as hidden (or visible again)
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.visible = !hidden;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// One past the last row holding a cell
    pub fn row_count(&self) -> usize {
        self.rows.keys().next_back().map_or(0, |last| last + 1)
    }

    /// Cell at an absolute 0-based position; anything unset reads as empty
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        self.rows
            .get(&row)
            .and_then(|r| r.get(&col))
            .unwrap_or(&EMPTY)
    }

    /// Index of the last non-empty cell in a row
    pub fn last_column(&self, row: usize) -> Option<usize> {
        self.rows.get(&row)?.keys().next_back().copied()
    }

    /// Sheet-qualified A1 reference, e.g. `table_2!B4`
    pub fn a1(&self, row: usize, col: usize) -> String {
        format!("{}!{}", self.name, reference::a1(row, col))
    }
}

/// An ordered collection of sheets read from one file
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}
