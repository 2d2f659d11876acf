//! Accelerator indicators: one auxiliary row per sellers sheet.

use crate::types::{DataSet, Value};
use crate::workbook::Sheet;

use super::kind::KindProfile;
use super::schema::accelerators_schema;

/// The accelerator row of `sheet`: the national ID followed by the profile's accelerator cells.
///
/// Returns `None` for kinds without accelerators. Cells outside the sheet read as null.
pub fn extract_accelerators(
    sheet: &Sheet,
    profile: &KindProfile,
    national_id: &str,
) -> Option<Vec<Value>> {
    if profile.accelerator_cells.is_empty() {
        return None;
    }
    let mut row = vec![Value::from(national_id)];
    row.extend(
        profile
            .accelerator_cells
            .iter()
            .map(|at| sheet.cell_or_null(*at).clone()),
    );
    Some(row)
}

/// Collects accelerator rows across the sheets of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceleratorTable {
    data: DataSet,
}

impl AcceleratorTable {
    pub fn new() -> Self {
        Self {
            data: DataSet::empty(accelerators_schema()),
        }
    }

    pub fn push(&mut self, row: Vec<Value>) {
        self.data.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> DataSet {
        self.data
    }
}

impl Default for AcceleratorTable {
    fn default() -> Self {
        Self::new()
    }
}
