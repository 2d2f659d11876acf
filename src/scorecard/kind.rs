//! Submission kinds and their layout profiles.
//!
//! Every kind runs through the same pipeline; what differs (where identity fields live, which
//! columns are emitted, whether accelerators or an HR summary exist) is captured by a
//! [`KindProfile`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Schema;
use crate::workbook::{CellRef, Sheet};

use super::schema;
use super::structure::is_identity_code;

/// Closed set of scorecard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    /// Free-form scorecard; identity comes from an `<role>_<branch>_<id>` code in A1.
    Leaders,
    /// Fixed-cell form with identity in B1:B4 and compensation figures in K1:K5.
    Form,
    /// Sellers scorecard: national ID in B1, segment in B2, accelerators in H2:M2, plus an
    /// optional HR summary sheet.
    Sellers,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Leaders => "leaders",
            SubmissionKind::Form => "form",
            SubmissionKind::Sellers => "sellers",
        }
    }

    /// Recognize a non-sellers layout from one sheet's fixed cells.
    ///
    /// An identity code in A1 means [`SubmissionKind::Leaders`]; a filled-in B1:B4 block means
    /// [`SubmissionKind::Form`]. Anything else is left undecided.
    pub fn infer_from_sheet(sheet: &Sheet) -> Option<SubmissionKind> {
        let a1 = sheet.cell_or_null(CellRef::new(0, 0)).to_text();
        if is_identity_code(a1.trim()) {
            return Some(SubmissionKind::Leaders);
        }
        let form = KindProfile::for_kind(SubmissionKind::Form);
        let filled = form
            .required_form_cells()
            .iter()
            .all(|(_, at)| !sheet.cell_or_null(*at).is_empty());
        filled.then_some(SubmissionKind::Form)
    }
}

/// Logical fields that live at fixed cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    IdentityCode,
    Role,
    NationalId,
    Segment,
    InfluenceArea,
    Commissions,
    Overtime50,
    Overtime100,
    ProductivityIncentive,
    IncentiveAdjustment,
}

impl FormField {
    /// Compensation fields in output order.
    pub const COMPENSATION: [FormField; 5] = [
        FormField::Commissions,
        FormField::Overtime50,
        FormField::Overtime100,
        FormField::ProductivityIncentive,
        FormField::IncentiveAdjustment,
    ];
}

/// Named-cell map: logical field -> cell coordinate, resolved once per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellMap(BTreeMap<FormField, CellRef>);

impl CellMap {
    pub fn with(mut self, field: FormField, at: CellRef) -> Self {
        self.0.insert(field, at);
        self
    }

    pub fn get(&self, field: FormField) -> Option<CellRef> {
        self.0.get(&field).copied()
    }
}

/// Everything the pipeline needs to know about one kind's layout.
#[derive(Debug, Clone, PartialEq)]
pub struct KindProfile {
    /// Kind this profile describes.
    pub kind: SubmissionKind,
    /// Fixed cells holding identity and compensation fields.
    pub cells: CellMap,
    /// Mapped cells that must be non-empty, in check order.
    pub required_cells: Vec<FormField>,
    /// Role written for every row when the layout carries no role cell.
    pub fixed_role: Option<&'static str>,
    /// Cells holding the accelerator indicators, if the kind has them.
    pub accelerator_cells: Vec<CellRef>,
    /// Whether a sheet with the configured HR summary name is routed to the HR path.
    pub has_hr_summary: bool,
    /// Column layout of the main output table.
    pub output_schema: Schema,
}

impl KindProfile {
    pub fn for_kind(kind: SubmissionKind) -> Self {
        match kind {
            SubmissionKind::Leaders => Self {
                kind,
                cells: CellMap::default().with(FormField::IdentityCode, CellRef::new(0, 0)),
                required_cells: Vec::new(),
                fixed_role: None,
                accelerator_cells: Vec::new(),
                has_hr_summary: false,
                output_schema: schema::base_output_schema(),
            },
            SubmissionKind::Form => Self {
                kind,
                cells: CellMap::default()
                    .with(FormField::Role, CellRef::new(0, 1))
                    .with(FormField::NationalId, CellRef::new(1, 1))
                    .with(FormField::Segment, CellRef::new(2, 1))
                    .with(FormField::InfluenceArea, CellRef::new(3, 1))
                    .with(FormField::Commissions, CellRef::new(0, 10))
                    .with(FormField::Overtime50, CellRef::new(1, 10))
                    .with(FormField::Overtime100, CellRef::new(2, 10))
                    .with(FormField::ProductivityIncentive, CellRef::new(3, 10))
                    .with(FormField::IncentiveAdjustment, CellRef::new(4, 10)),
                required_cells: vec![
                    FormField::Role,
                    FormField::NationalId,
                    FormField::Segment,
                    FormField::InfluenceArea,
                ],
                fixed_role: None,
                accelerator_cells: Vec::new(),
                has_hr_summary: false,
                output_schema: schema::base_output_schema()
                    .extended(&schema::compensation_schema()),
            },
            SubmissionKind::Sellers => Self {
                kind,
                cells: CellMap::default()
                    .with(FormField::NationalId, CellRef::new(0, 1))
                    .with(FormField::Segment, CellRef::new(1, 1)),
                required_cells: Vec::new(),
                fixed_role: Some("Vendedor"),
                // H2:M2
                accelerator_cells: (7..13).map(|col| CellRef::new(1, col)).collect(),
                has_hr_summary: true,
                output_schema: schema::base_output_schema(),
            },
        }
    }

    /// Cells that must be non-empty, with their coordinates.
    pub fn required_form_cells(&self) -> Vec<(FormField, CellRef)> {
        self.required_cells
            .iter()
            .filter_map(|f| self.cells.get(*f).map(|at| (*f, at)))
            .collect()
    }

    /// Compensation cells present in this layout, in output order.
    pub fn compensation_cells(&self) -> Vec<(FormField, CellRef)> {
        FormField::COMPENSATION
            .into_iter()
            .filter_map(|f| self.cells.get(f).map(|at| (f, at)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn first_sheet_layout_decides_between_leaders_and_form() {
        let leaders = Sheet::new(
            "Juan",
            vec![vec![Value::from("Gerente.Comercial_Jujuy_20301508493")]],
        );
        assert_eq!(
            SubmissionKind::infer_from_sheet(&leaders),
            Some(SubmissionKind::Leaders)
        );

        let form = Sheet::new(
            "Perez",
            vec![
                vec![Value::Null, Value::from("Jefe")],
                vec![Value::Null, Value::Float64(20301508493.0)],
                vec![Value::Null, Value::from("Postventa")],
                vec![Value::Null, Value::from("Jujuy")],
            ],
        );
        assert_eq!(SubmissionKind::infer_from_sheet(&form), Some(SubmissionKind::Form));

        let blank = Sheet::new("x", vec![vec![Value::from("Tablero")]]);
        assert_eq!(SubmissionKind::infer_from_sheet(&blank), None);
    }

    #[test]
    fn form_profile_reads_b_and_k_columns() {
        let profile = KindProfile::for_kind(SubmissionKind::Form);
        let required: Vec<String> = profile
            .required_form_cells()
            .iter()
            .map(|(_, at)| at.to_string())
            .collect();
        assert_eq!(required, vec!["B1", "B2", "B3", "B4"]);
        let comp: Vec<String> = profile
            .compensation_cells()
            .iter()
            .map(|(_, at)| at.to_string())
            .collect();
        assert_eq!(comp, vec!["K1", "K2", "K3", "K4", "K5"]);
        assert_eq!(profile.output_schema.fields.len(), 26);
    }

    #[test]
    fn sellers_profile_has_accelerators_and_hr_summary() {
        let profile = KindProfile::for_kind(SubmissionKind::Sellers);
        assert_eq!(profile.accelerator_cells.first().map(|c| c.to_string()), Some("H2".into()));
        assert_eq!(profile.accelerator_cells.last().map(|c| c.to_string()), Some("M2".into()));
        assert!(profile.has_hr_summary);
        assert!(profile.compensation_cells().is_empty());
        assert!(profile.required_form_cells().is_empty());
        assert_eq!(profile.fixed_role, Some("Vendedor"));
    }
}
