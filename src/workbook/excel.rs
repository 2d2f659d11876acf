//! Decoding uploaded workbook bytes with calamine.

use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets, Xlsx, XlsxError};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{IntakeError, IntakeResult};
use crate::types::Value;

use super::{CellRef, Sheet, Workbook};

/// Rows read from a sheet; a non-empty cell below them rejects the workbook.
pub const MAX_SHEET_ROWS: usize = 5_000;
/// Columns read from a sheet; a non-empty cell right of them rejects the workbook.
pub const MAX_SHEET_COLS: usize = 200;

/// Read every sheet of an uploaded workbook, in workbook order.
///
/// Behavior:
/// - The format (`.xlsx`, `.xls`, `.ods`, ...) is sniffed from the bytes
/// - Each sheet becomes a rectangular grid anchored at A1, whatever the used range's origin
/// - Cells keep their spreadsheet type (number, text, bool, date); blanks become `Null`
/// - A non-empty cell outside [`MAX_SHEET_ROWS`] x [`MAX_SHEET_COLS`] is
///   [`IntakeError::SheetTooLarge`]; `.xlsx` sheets are streamed cell by cell, so the grid is
///   never allocated for such a sheet
pub fn read_workbook(bytes: &[u8]) -> IntakeResult<Workbook> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let cells = match &mut workbook {
            Sheets::Xlsx(xlsx) => xlsx_cells(xlsx, &name)?,
            other => {
                let range = other.worksheet_range(&name)?;
                let (row0, col0) = range.start().unwrap_or((0, 0));
                range
                    .used_cells()
                    .map(|(r, c, cell)| (row0 as usize + r, col0 as usize + c, cell.clone()))
                    .collect()
            }
        };
        let sheet = sheet_from_cells(&name, cells)?;
        debug!(sheet = %name, rows = sheet.height(), cols = sheet.width(), "read sheet");
        sheets.push(sheet);
    }

    Ok(Workbook::new(sheets))
}

/// Non-empty cells of one `.xlsx` worksheet as absolute `(row, col, value)` triples.
fn xlsx_cells<RS: Read + Seek>(
    xlsx: &mut Xlsx<RS>,
    name: &str,
) -> IntakeResult<Vec<(usize, usize, Data)>> {
    let mut reader = match xlsx.worksheet_cells_reader(name) {
        Ok(reader) => reader,
        // Chart sheets carry no cells.
        Err(XlsxError::NotAWorksheet(_)) => return Ok(Vec::new()),
        Err(e) => return Err(calamine::Error::Xlsx(e).into()),
    };

    let mut cells = Vec::new();
    while let Some(cell) = reader.next_cell().map_err(calamine::Error::Xlsx)? {
        let data = Data::from(cell.get_value().clone());
        if data == Data::Empty {
            continue;
        }
        let (row, col) = cell.get_position();
        let (row, col) = (row as usize, col as usize);
        check_bounds(name, row, col)?;
        cells.push((row, col, data));
    }
    Ok(cells)
}

fn check_bounds(name: &str, row: usize, col: usize) -> IntakeResult<()> {
    if row >= MAX_SHEET_ROWS || col >= MAX_SHEET_COLS {
        return Err(IntakeError::SheetTooLarge {
            sheet: name.to_string(),
            cell: CellRef::new(row, col).to_string(),
            max_rows: MAX_SHEET_ROWS,
            max_cols: MAX_SHEET_COLS,
        });
    }
    Ok(())
}

/// Lay sparse cells out on a grid anchored at A1, sized to the last non-empty cell.
fn sheet_from_cells(name: &str, cells: Vec<(usize, usize, Data)>) -> IntakeResult<Sheet> {
    for (row, col, _) in &cells {
        check_bounds(name, *row, *col)?;
    }
    let height = cells.iter().map(|(r, _, _)| r + 1).max().unwrap_or(0);
    let width = cells.iter().map(|(_, c, _)| c + 1).max().unwrap_or(0);

    let mut grid = vec![vec![Value::Null; width]; height];
    for (row, col, cell) in cells {
        grid[row][col] = convert_cell(&cell);
    }
    Ok(Sheet::new(name, grid))
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Value::DateTime)
            .unwrap_or(Value::Float64(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Value::DateTime)
            .unwrap_or_else(|| Value::Utf8(s.clone())),
        Data::DurationIso(s) => Value::Utf8(s.clone()),
        Data::Error(e) => Value::Utf8(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}
