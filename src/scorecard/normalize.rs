//! Indicator Table Normalizer.
//!
//! Turns the free-form region of a scorecard sheet into a typed [`DataSet`]:
//!
//! 1. find the header row (first cell is `Tipo Indicador`)
//! 2. measure the data block by scanning the indicator-name column down to its first blank cell
//! 3. check every required column is present (exact header text)
//! 4. project to the kind's fixed output layout, prepending identity and submission metadata

use tracing::debug;

use crate::error::{IntakeError, IntakeResult};
use crate::types::{DataSet, Value};
use crate::workbook::Sheet;

use super::form::SheetIdentity;
use super::kind::KindProfile;
use super::schema::{INDICATOR_NAME, INDICATOR_TYPE, indicator_schema};

/// The indicator rows of one sheet, projected onto [`indicator_schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    /// Sheet the table was read from.
    pub sheet: String,
    /// 1-based spreadsheet row number of the first data row, for messages.
    pub first_row: usize,
    /// Rows projected onto the indicator schema.
    pub data: DataSet,
}

impl IndicatorTable {
    /// Spreadsheet row number of the `idx`-th data row.
    pub fn row_number(&self, idx: usize) -> usize {
        self.first_row + idx
    }
}

/// Submission-level values repeated on every output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionMeta {
    /// Submitter named by the filename.
    pub submitter: String,
    /// Literal `DD-MM-YYYY` filename segment.
    pub period_text: String,
    /// Branch named by the filename.
    pub branch: String,
    /// Upload timestamp, already formatted.
    pub uploaded_at_text: String,
}

/// Index of the header row: the first row whose first cell is exactly `Tipo Indicador`.
pub fn locate_header(sheet: &Sheet) -> IntakeResult<usize> {
    sheet
        .rows()
        .position(|row| matches!(row.first(), Some(Value::Utf8(s)) if s == INDICATOR_TYPE))
        .ok_or_else(|| IntakeError::HeaderNotFound {
            sheet: sheet.name.clone(),
            header: INDICATOR_TYPE.to_string(),
        })
}

/// Number of data rows below `header_row`: rows up to (not including) the first blank cell in
/// `sentinel_col`, or to the end of the sheet.
pub fn data_extent(sheet: &Sheet, header_row: usize, sentinel_col: usize) -> usize {
    (header_row + 1..sheet.height())
        .take_while(|&r| sheet.get(r, sentinel_col).is_some_and(|v| !v.is_empty()))
        .count()
}

/// Locate, measure and type-check the indicator table of a sheet.
pub fn extract_indicator_table(sheet: &Sheet) -> IntakeResult<IndicatorTable> {
    let header_row = locate_header(sheet)?;
    let labels: Vec<String> = sheet
        .row(header_row)
        .unwrap_or_default()
        .iter()
        .map(Value::to_text)
        .collect();

    let sentinel_col = labels
        .iter()
        .position(|l| l == INDICATOR_NAME)
        .ok_or_else(|| IntakeError::HeaderNotFound {
            sheet: sheet.name.clone(),
            header: INDICATOR_NAME.to_string(),
        })?;

    let extent = data_extent(sheet, header_row, sentinel_col);
    if extent == 0 {
        return Err(IntakeError::EmptyDataBlock {
            sheet: sheet.name.clone(),
        });
    }

    let schema = indicator_schema();
    let missing = schema.missing_from(labels.iter().map(String::as_str));
    if !missing.is_empty() {
        return Err(IntakeError::MissingColumns {
            sheet: sheet.name.clone(),
            missing,
        });
    }

    // Every schema field is present, so each lookup resolves.
    let col_idxs: Vec<usize> = schema
        .fields
        .iter()
        .filter_map(|f| labels.iter().position(|l| *l == f.name))
        .collect();

    let rows = (header_row + 1..header_row + 1 + extent)
        .map(|r| {
            col_idxs
                .iter()
                .map(|&c| sheet.get(r, c).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    debug!(sheet = %sheet.name, header_row, rows = extent, "indicator table located");

    Ok(IndicatorTable {
        sheet: sheet.name.clone(),
        first_row: header_row + 2,
        data: DataSet::new(schema, rows),
    })
}

/// Project an indicator table onto the kind's output layout.
///
/// Column order: identity and submission metadata, the indicator columns, then any
/// kind-specific trailing columns (compensation figures).
pub fn to_output_rows(
    table: &IndicatorTable,
    identity: &SheetIdentity,
    meta: &SubmissionMeta,
    profile: &KindProfile,
) -> IntakeResult<DataSet> {
    let prefix: Vec<Value> = [
        identity.role.as_str(),
        identity.national_id.as_str(),
        identity.segment.as_str(),
        identity.influence_area.as_str(),
        meta.submitter.as_str(),
        meta.period_text.as_str(),
        meta.branch.as_str(),
        meta.uploaded_at_text.as_str(),
    ]
    .into_iter()
    .map(Value::from)
    .collect();

    let width = prefix.len() + table.data.schema.fields.len() + identity.compensation.len();
    if width != profile.output_schema.fields.len() {
        return Err(IntakeError::SchemaMismatch {
            message: format!(
                "sheet '{}' produces {width} columns but the {} layout has {}",
                table.sheet,
                profile.kind.as_str(),
                profile.output_schema.fields.len()
            ),
        });
    }

    let rows = table
        .data
        .rows
        .iter()
        .map(|row| {
            let mut out = Vec::with_capacity(width);
            out.extend(prefix.iter().cloned());
            out.extend(row.iter().cloned());
            out.extend(identity.compensation.iter().cloned());
            out
        })
        .collect();

    Ok(DataSet::new(profile.output_schema.clone(), rows))
}
