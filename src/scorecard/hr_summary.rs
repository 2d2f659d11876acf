//! HR summary sheet ("Resumen RRHH") of sellers workbooks.
//!
//! Unlike scorecard sheets this is a plain table: the header is the second row and every row
//! below it is data.

use crate::error::{IntakeError, IntakeResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};
use crate::workbook::Sheet;

use super::schema::hr_summary_schema;

/// Zero-based index of the header row.
pub const HR_HEADER_ROW: usize = 1;

/// Validate and extract the HR summary table.
///
/// - header labels are trimmed before matching against the required columns
/// - every labelled column is kept, in sheet order
/// - rows whose required columns are all empty are dropped
pub fn extract_hr_summary(sheet: &Sheet) -> IntakeResult<DataSet> {
    if sheet.is_empty() {
        return Err(IntakeError::EmptySheet {
            sheet: sheet.name.clone(),
        });
    }

    let labels: Vec<String> = sheet
        .row(HR_HEADER_ROW)
        .unwrap_or_default()
        .iter()
        .map(|v| v.to_text().trim().to_string())
        .collect();

    let required = hr_summary_schema();
    let missing = required.missing_from(labels.iter().map(String::as_str));
    if !missing.is_empty() {
        return Err(IntakeError::MissingColumns {
            sheet: sheet.name.clone(),
            missing,
        });
    }

    let kept: Vec<(usize, Field)> = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| !label.is_empty())
        .map(|(idx, label)| {
            let data_type = required
                .fields
                .iter()
                .find(|f| f.name == *label)
                .map_or(DataType::Utf8, |f| f.data_type);
            (idx, Field::new(label.clone(), data_type))
        })
        .collect();

    let required_idxs: Vec<usize> = required
        .fields
        .iter()
        .filter_map(|f| labels.iter().position(|l| *l == f.name))
        .collect();

    let rows = sheet
        .rows()
        .skip(HR_HEADER_ROW + 1)
        .filter(|row| {
            required_idxs
                .iter()
                .any(|&c| row.get(c).is_some_and(|v| !v.is_empty()))
        })
        .map(|row| {
            kept.iter()
                .map(|(c, _)| row.get(*c).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    let schema = Schema::new(kept.into_iter().map(|(_, f)| f).collect());
    Ok(DataSet::new(schema, rows))
}
