//! Shared fixtures: scorecard workbooks generated at runtime with `rust_xlsxwriter`.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};

use scorecard_intake::clock::{Clock, FixedClock};
use scorecard_intake::scorecard::schema::{hr_summary_schema, indicator_schema};

/// Clock in the reference timezone (UTC-3).
pub fn clock_at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap(),
    ))
}

/// 10 April 2025, 09:30: March 2025 is in the window and before the default cutoff.
pub fn april_clock() -> Arc<dyn Clock> {
    clock_at(2025, 4, 10, 9, 30)
}

#[derive(Debug, Clone)]
pub enum Updated {
    Text(&'static str),
    Date(u16, u8, u8),
    Blank,
}

#[derive(Debug, Clone)]
pub struct Indicator {
    pub name: &'static str,
    pub weight: Option<f64>,
    pub updated: Updated,
}

impl Indicator {
    pub fn new(name: &'static str, weight: f64) -> Self {
        Self {
            name,
            weight: Some(weight),
            updated: Updated::Text("15/03/2025"),
        }
    }

    pub fn updated(mut self, updated: Updated) -> Self {
        self.updated = updated;
        self
    }
}

/// Three indicators summing to 1.0, all updated in the past.
pub fn standard_indicators() -> Vec<Indicator> {
    vec![
        Indicator::new("Ventas", 0.5),
        Indicator::new("NPS", 0.3),
        Indicator::new("Ausentismo", 0.2),
    ]
}

#[derive(Debug, Clone)]
pub enum Layout {
    Leaders { code: String },
    Form { role: String, national_id: String, segment: String, area: String },
    Sellers { national_id: String, segment: String, accelerators: [f64; 6] },
}

#[derive(Debug, Clone)]
pub struct SheetSpec {
    pub name: String,
    pub layout: Layout,
    pub indicators: Vec<Indicator>,
}

impl SheetSpec {
    pub fn leaders(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            layout: Layout::Leaders { code: code.to_string() },
            indicators: standard_indicators(),
        }
    }

    pub fn form(name: &str, national_id: &str) -> Self {
        Self {
            name: name.to_string(),
            layout: Layout::Form {
                role: "Jefe de Taller".to_string(),
                national_id: national_id.to_string(),
                segment: "Postventa".to_string(),
                area: "Taller".to_string(),
            },
            indicators: standard_indicators(),
        }
    }

    pub fn sellers(name: &str, national_id: &str) -> Self {
        Self {
            name: name.to_string(),
            layout: Layout::Sellers {
                national_id: national_id.to_string(),
                segment: "0km".to_string(),
                accelerators: [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            },
            indicators: standard_indicators(),
        }
    }

    pub fn with_indicators(mut self, indicators: Vec<Indicator>) -> Self {
        self.indicators = indicators;
        self
    }
}

/// One seller line of the HR summary.
#[derive(Debug, Clone)]
pub struct HrRow {
    pub seller: &'static str,
    pub cuit: &'static str,
    pub total: f64,
}

pub fn build_workbook(sheets: &[SheetSpec], hr_summary: Option<&[HrRow]>) -> Vec<u8> {
    let mut wb = Workbook::new();
    for spec in sheets {
        let ws = wb.add_worksheet();
        ws.set_name(&spec.name).unwrap();
        let header_row = write_layout(ws, &spec.layout);
        write_indicator_table(ws, header_row, &spec.indicators);
    }
    if let Some(rows) = hr_summary {
        let ws = wb.add_worksheet();
        ws.set_name("Resumen RRHH").unwrap();
        write_hr_summary(ws, rows);
    }
    wb.save_to_buffer().unwrap()
}

/// Writes the fixed cells of a layout and returns the row of the indicator header.
fn write_layout(ws: &mut Worksheet, layout: &Layout) -> u32 {
    match layout {
        Layout::Leaders { code } => {
            ws.write_string(0, 0, code).unwrap();
            2
        }
        Layout::Form { role, national_id, segment, area } => {
            let labels = ["Cargo", "CUIL", "Segmento", "Área de influencia"];
            for (row, (label, value)) in labels.iter().zip([role, national_id, segment, area]).enumerate() {
                ws.write_string(row as u32, 0, *label).unwrap();
                ws.write_string(row as u32, 1, value).unwrap();
            }
            for (row, amount) in [12000.0, 3.0, 1.5, 800.0, 0.0].into_iter().enumerate() {
                ws.write_string(row as u32, 9, "Monto").unwrap();
                ws.write_number(row as u32, 10, amount).unwrap();
            }
            6
        }
        Layout::Sellers { national_id, segment, accelerators } => {
            ws.write_string(0, 0, "CUIL").unwrap();
            ws.write_string(0, 1, national_id).unwrap();
            ws.write_string(1, 0, "Segmento").unwrap();
            ws.write_string(1, 1, segment).unwrap();
            for (i, value) in accelerators.iter().enumerate() {
                ws.write_string(0, 7 + i as u16, format!("Acelerador {}", i + 1)).unwrap();
                ws.write_number(1, 7 + i as u16, *value).unwrap();
            }
            4
        }
    }
}

fn write_indicator_table(ws: &mut Worksheet, header_row: u32, indicators: &[Indicator]) {
    let schema = indicator_schema();
    for (col, name) in schema.field_names().enumerate() {
        ws.write_string(header_row, col as u16, name).unwrap();
    }

    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    for (i, ind) in indicators.iter().enumerate() {
        let row = header_row + 1 + i as u32;
        ws.write_string(row, 0, "Cuantitativo").unwrap();
        ws.write_string(row, 1, "Porcentaje").unwrap();
        ws.write_string(row, 2, ind.name).unwrap();
        if let Some(w) = ind.weight {
            ws.write_number(row, 3, w).unwrap();
        }
        ws.write_number(row, 4, 0.7).unwrap();
        ws.write_number(row, 5, 0.9).unwrap();
        ws.write_number(row, 6, 1.2).unwrap();
        ws.write_number(row, 7, 0.95).unwrap();
        ws.write_number(row, 8, 1.05).unwrap();
        ws.write_string(row, 9, "Muy Bueno").unwrap();
        match ind.updated {
            Updated::Text(text) => {
                ws.write_string(row, 10, text).unwrap();
            }
            Updated::Date(y, m, d) => {
                let date = ExcelDateTime::from_ymd(y, m, d).unwrap();
                ws.write_datetime_with_format(row, 10, &date, &date_format).unwrap();
            }
            Updated::Blank => {}
        }
        ws.write_string(row, 11, "Carlos Diaz").unwrap();
        ws.write_string(row, 12, "sin observaciones").unwrap();
    }

    // A footer after a blank row must not be read as data.
    let footer = header_row + 2 + indicators.len() as u32;
    ws.write_string(footer, 2, "Total").unwrap();
}

fn write_hr_summary(ws: &mut Worksheet, rows: &[HrRow]) {
    ws.write_string(0, 0, "Liquidación de vendedores").unwrap();
    for (col, name) in hr_summary_schema().field_names().enumerate() {
        ws.write_string(1, col as u16, format!(" {name}")).unwrap();
    }
    for (i, r) in rows.iter().enumerate() {
        let row = 2 + i as u32;
        ws.write_string(row, 0, "Jujuy").unwrap();
        ws.write_string(row, 1, r.seller).unwrap();
        ws.write_string(row, 2, r.cuit).unwrap();
        ws.write_number(row, 12, r.total).unwrap();
    }
}
