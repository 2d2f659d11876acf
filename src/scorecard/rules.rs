//! Business Rule Validator: semantic checks over a normalized indicator table.
//!
//! Checks run in a fixed order and the first failure wins: weights are numeric, no weight is
//! zero, weights sum into the tolerance window, required indicators are present, update dates
//! parse and are not in the future. Cross-sheet uniqueness runs once per submission.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::WeightTolerance;
use crate::error::{IntakeError, IntakeResult};
use crate::types::Value;

use super::normalize::IndicatorTable;
use super::schema::{INDICATOR_NAME, LAST_UPDATE, WEIGHT};

/// Text format accepted for the last-update column.
pub const UPDATE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Everything [`validate_indicators`] needs besides the table itself.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    /// Accepted weight-sum range.
    pub tolerance: WeightTolerance,
    /// Indicators the sheet must list.
    pub required_indicators: &'a [String],
    /// Reference date for the future-date check.
    pub today: NaiveDate,
}

/// Run every per-sheet rule, in order.
pub fn validate_indicators(table: &IndicatorTable, ctx: &RuleContext<'_>) -> IntakeResult<()> {
    check_weights_numeric(table)?;
    check_zero_weights(table)?;
    check_weight_sum(table, ctx.tolerance)?;
    check_required_indicators(table, ctx.required_indicators)?;
    check_update_dates(table, ctx.today)
}

fn column_index(table: &IndicatorTable, name: &str) -> IntakeResult<usize> {
    table
        .data
        .schema
        .index_of(name)
        .ok_or_else(|| IntakeError::MissingColumns {
            sheet: table.sheet.clone(),
            missing: vec![name.to_string()],
        })
}

/// Every non-empty weight is a number or numeric text.
pub fn check_weights_numeric(table: &IndicatorTable) -> IntakeResult<()> {
    let w = column_index(table, WEIGHT)?;
    for (idx, row) in table.data.rows.iter().enumerate() {
        let value = &row[w];
        if !value.is_empty() && value.as_f64().is_none() {
            return Err(IntakeError::NonNumericWeight {
                sheet: table.sheet.clone(),
                row: table.row_number(idx),
                raw: value.to_text(),
            });
        }
    }
    Ok(())
}

/// No row may carry a weight of exactly 0.
pub fn check_zero_weights(table: &IndicatorTable) -> IntakeResult<()> {
    let w = column_index(table, WEIGHT)?;
    let n = column_index(table, INDICATOR_NAME)?;

    let zero = table
        .data
        .filter_rows(|row| row[w].as_f64() == Some(0.0));
    if zero.is_empty() {
        return Ok(());
    }

    Err(IntakeError::ZeroWeightRow {
        sheet: table.sheet.clone(),
        column: WEIGHT.to_string(),
        indicators: zero.rows.iter().map(|row| row[n].to_text()).collect(),
    })
}

/// Sum of the weights (nulls skipped).
pub fn weight_sum(table: &IndicatorTable) -> IntakeResult<f64> {
    let w = column_index(table, WEIGHT)?;
    Ok(table
        .data
        .reduce_rows(0.0, |acc, row| acc + row[w].as_f64().unwrap_or(0.0)))
}

/// The weights must add up to a value inside `tolerance`.
pub fn check_weight_sum(table: &IndicatorTable, tolerance: WeightTolerance) -> IntakeResult<()> {
    let sum = weight_sum(table)?;
    if tolerance.contains(sum) {
        Ok(())
    } else {
        Err(IntakeError::WeightSumOutOfRange {
            sheet: table.sheet.clone(),
            sum,
            min: tolerance.min,
            max: tolerance.max,
        })
    }
}

/// Every name in `required` appears (trimmed, exact) in the indicator-name column.
pub fn check_required_indicators(table: &IndicatorTable, required: &[String]) -> IntakeResult<()> {
    if required.is_empty() {
        return Ok(());
    }
    let n = column_index(table, INDICATOR_NAME)?;
    let present: Vec<String> = table
        .data
        .rows
        .iter()
        .map(|row| row[n].to_text().trim().to_string())
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !present.iter().any(|p| p == name.trim()))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(IntakeError::MissingRequiredIndicator {
            sheet: table.sheet.clone(),
            missing,
        })
    }
}

/// Date carried by a last-update cell: a native date cell, or `dd/mm/YYYY` text.
pub fn parse_update_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::DateTime(dt) => Some(dt.date()),
        Value::Utf8(s) => NaiveDate::parse_from_str(s.trim(), UPDATE_DATE_FORMAT).ok(),
        _ => None,
    }
}

/// Every last-update value parses, and none is later than `today`.
///
/// All rows are format-checked before any is compared with `today`.
pub fn check_update_dates(table: &IndicatorTable, today: NaiveDate) -> IntakeResult<()> {
    let d = column_index(table, LAST_UPDATE)?;

    let mut dates = Vec::with_capacity(table.data.row_count());
    for (idx, row) in table.data.rows.iter().enumerate() {
        match parse_update_date(&row[d]) {
            Some(date) => dates.push(date),
            None => {
                return Err(IntakeError::InvalidDateFormat {
                    sheet: table.sheet.clone(),
                    row: table.row_number(idx),
                    column: LAST_UPDATE.to_string(),
                    raw: row[d].to_text(),
                });
            }
        }
    }

    if let Some((idx, date)) = dates.iter().enumerate().find(|(_, date)| **date > today) {
        return Err(IntakeError::FutureUpdateDate {
            sheet: table.sheet.clone(),
            row: table.row_number(idx),
            column: LAST_UPDATE.to_string(),
            date: date.format(UPDATE_DATE_FORMAT).to_string(),
            today: today.format(UPDATE_DATE_FORMAT).to_string(),
        });
    }
    Ok(())
}

/// A national ID may identify at most one sheet of a submission.
///
/// `identities` holds `(sheet name, national id)` pairs in workbook order. The first repeated
/// ID (in order of first appearance) is reported with every sheet that carries it.
pub fn check_unique_identities(identities: &[(String, String)]) -> IntakeResult<()> {
    let mut by_id: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut order: Vec<&str> = Vec::new();
    for (sheet, id) in identities {
        let sheets = by_id.entry(id.as_str()).or_default();
        if sheets.is_empty() {
            order.push(id.as_str());
        }
        sheets.push(sheet.clone());
    }

    for id in order {
        if let Some(sheets) = by_id.get(id).filter(|s| s.len() > 1) {
            return Err(IntakeError::DuplicateIdentityInSubmission {
                national_id: id.to_string(),
                sheets: sheets.clone(),
            });
        }
    }
    Ok(())
}
