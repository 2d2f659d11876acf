use crate::types::Value;

use super::CellRef;

/// One tab of a workbook: a name and a rectangular grid of cells anchored at A1.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Tab name.
    pub name: String,
    rows: Vec<Vec<Value>>,
    width: usize,
}

impl Sheet {
    /// Build a sheet from ragged rows; short rows are padded with [`Value::Null`].
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, Value::Null);
                r
            })
            .collect();
        Self {
            name: name.into(),
            rows,
            width,
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `true` when the sheet has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width == 0
    }

    /// Cell at `(row, col)`, or `None` when outside the sheet's bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row)?.get(col)
    }

    pub fn cell(&self, at: CellRef) -> Option<&Value> {
        self.get(at.row, at.col)
    }

    /// Like [`Self::cell`] but out-of-bounds reads as [`Value::Null`].
    pub fn cell_or_null(&self, at: CellRef) -> &Value {
        self.cell(at).unwrap_or(&Value::Null)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn row(&self, idx: usize) -> Option<&[Value]> {
        self.rows.get(idx).map(Vec::as_slice)
    }
}

/// An ordered set of sheets read from one upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    /// Sheets in workbook order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}
