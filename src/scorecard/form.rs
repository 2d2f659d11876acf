//! Form Field Extractor: identity and compensation fields read from fixed cell coordinates.

use crate::error::{IntakeError, IntakeResult};
use crate::types::Value;
use crate::workbook::Sheet;

use super::kind::{FormField, KindProfile, SubmissionKind};

/// Raw values of the fixed-form cells, as found in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    /// B1.
    pub role: Value,
    /// B2.
    pub national_id: Value,
    /// B3.
    pub segment: Value,
    /// B4.
    pub influence_area: Value,
    /// Compensation figures in output order.
    pub compensation: Vec<Value>,
}

/// Read every form cell of `profile` from `sheet`.
///
/// Returns `None` when any mapped coordinate lies outside the sheet; the caller decides
/// whether that is fatal.
pub fn extract_form_fields(sheet: &Sheet, profile: &KindProfile) -> Option<FormFields> {
    let read = |field: FormField| -> Option<Value> {
        match profile.cells.get(field) {
            Some(at) => sheet.cell(at).cloned(),
            None => Some(Value::Null),
        }
    };

    let compensation = profile
        .compensation_cells()
        .into_iter()
        .map(|(_, at)| sheet.cell(at).cloned())
        .collect::<Option<Vec<_>>>()?;

    Some(FormFields {
        role: read(FormField::Role)?,
        national_id: read(FormField::NationalId)?,
        segment: read(FormField::Segment)?,
        influence_area: read(FormField::InfluenceArea)?,
        compensation,
    })
}

/// Identity of the person a scorecard sheet belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetIdentity {
    /// Job role ("Cargo").
    pub role: String,
    /// 11-digit national id ("CUIL").
    pub national_id: String,
    /// Business segment; empty for layouts without one.
    pub segment: String,
    /// Area of influence; empty for layouts without one.
    pub influence_area: String,
    /// Compensation figures (empty for kinds without them).
    pub compensation: Vec<Value>,
}

/// Resolve a sheet's identity according to its kind.
///
/// Assumes [`check_sheet_structure`](super::structure::check_sheet_structure) already passed.
pub fn extract_identity(sheet: &Sheet, profile: &KindProfile) -> IntakeResult<SheetIdentity> {
    match profile.kind {
        SubmissionKind::Leaders => {
            let code = profile
                .cells
                .get(FormField::IdentityCode)
                .map(|at| sheet.cell_or_null(at).to_text())
                .unwrap_or_default();
            let mut parts = code.trim().splitn(3, '_');
            let (Some(role), Some(_branch), Some(national_id)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(IntakeError::MalformedIdentityCell {
                    sheet: sheet.name.clone(),
                    value: code.clone(),
                });
            };
            Ok(SheetIdentity {
                role: role.to_string(),
                national_id: national_id.to_string(),
                segment: String::new(),
                influence_area: String::new(),
                compensation: Vec::new(),
            })
        }
        SubmissionKind::Form => {
            let incomplete = || IntakeError::IncompleteForm {
                sheet: sheet.name.clone(),
            };
            let fields = extract_form_fields(sheet, profile).ok_or_else(incomplete)?;
            let identity = [
                &fields.role,
                &fields.national_id,
                &fields.segment,
                &fields.influence_area,
            ];
            if identity.iter().any(|v| v.is_empty()) {
                return Err(incomplete());
            }
            Ok(SheetIdentity {
                role: fields.role.to_text().trim().to_string(),
                national_id: fields.national_id.to_text().trim().to_string(),
                segment: fields.segment.to_text().trim().to_string(),
                influence_area: fields.influence_area.to_text().trim().to_string(),
                compensation: fields.compensation,
            })
        }
        SubmissionKind::Sellers => {
            let text = |field| {
                profile
                    .cells
                    .get(field)
                    .map(|at| sheet.cell_or_null(at).to_text().trim().to_string())
                    .unwrap_or_default()
            };
            Ok(SheetIdentity {
                role: profile.fixed_role.unwrap_or_default().to_string(),
                national_id: text(FormField::NationalId),
                segment: text(FormField::Segment),
                influence_area: String::new(),
                compensation: Vec::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_grid(width: usize, height: usize) -> Vec<Vec<Value>> {
        vec![vec![Value::Null; width]; height]
    }

    #[test]
    fn out_of_bounds_form_cells_yield_none() {
        let profile = KindProfile::for_kind(SubmissionKind::Form);
        // Only columns A:B exist, so K1..K5 are out of bounds.
        let sheet = Sheet::new("Corta", form_grid(2, 5));
        assert!(extract_form_fields(&sheet, &profile).is_none());
        let err = extract_identity(&sheet, &profile).unwrap_err();
        assert!(matches!(err, IntakeError::IncompleteForm { .. }));
    }

    #[test]
    fn form_identity_is_read_from_column_b() {
        let profile = KindProfile::for_kind(SubmissionKind::Form);
        let mut grid = form_grid(11, 5);
        grid[0][1] = Value::from("Jefe de Taller ");
        grid[1][1] = Value::Float64(20301508493.0);
        grid[2][1] = Value::from("Postventa");
        grid[3][1] = Value::from("Taller");
        for (i, row) in grid.iter_mut().enumerate() {
            row[10] = Value::Float64(i as f64 * 100.0);
        }
        let identity = extract_identity(&Sheet::new("Perez", grid), &profile).unwrap();
        assert_eq!(identity.role, "Jefe de Taller");
        assert_eq!(identity.national_id, "20301508493");
        assert_eq!(identity.segment, "Postventa");
        assert_eq!(identity.influence_area, "Taller");
        assert_eq!(identity.compensation.len(), 5);
        assert_eq!(identity.compensation[4], Value::Float64(400.0));
    }

    #[test]
    fn empty_identity_cell_makes_the_form_incomplete() {
        let profile = KindProfile::for_kind(SubmissionKind::Form);
        let mut grid = form_grid(11, 5);
        grid[0][1] = Value::from("Jefe");
        grid[1][1] = Value::from("20301508493");
        grid[2][1] = Value::from("Postventa");
        let err = extract_identity(&Sheet::new("Perez", grid), &profile).unwrap_err();
        assert!(matches!(err, IntakeError::IncompleteForm { ref sheet } if sheet == "Perez"));
    }

    #[test]
    fn leaders_identity_comes_from_the_code() {
        let profile = KindProfile::for_kind(SubmissionKind::Leaders);
        let sheet = Sheet::new(
            "H1",
            vec![vec![Value::from("Gerente.Comercial_Jujuy_20301508493")]],
        );
        let identity = extract_identity(&sheet, &profile).unwrap();
        assert_eq!(identity.role, "Gerente.Comercial");
        assert_eq!(identity.national_id, "20301508493");
        assert!(identity.segment.is_empty());
    }

    #[test]
    fn sellers_identity_has_the_fixed_role() {
        let profile = KindProfile::for_kind(SubmissionKind::Sellers);
        let sheet = Sheet::new(
            "V1",
            vec![
                vec![Value::from("CUIL"), Value::from("27123456789")],
                vec![Value::from("Segmento"), Value::from("0km")],
            ],
        );
        let identity = extract_identity(&sheet, &profile).unwrap();
        assert_eq!(identity.role, "Vendedor");
        assert_eq!(identity.national_id, "27123456789");
        assert_eq!(identity.segment, "0km");
    }
}
