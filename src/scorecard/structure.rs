//! Sheet structural validation: the sheet is non-empty and its fixed cells look right for the
//! active kind. Runs before anything is extracted from the sheet.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{IntakeError, IntakeResult};
use crate::workbook::{CellRef, Sheet};

use super::kind::{FormField, KindProfile};

static IDENTITY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^_]+_[^_]+_\d{11}$").expect("identity pattern is valid"));

static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{11}$").expect("national id pattern is valid"));

/// `<role>_<branch>_<11 digits>`.
pub fn is_identity_code(text: &str) -> bool {
    IDENTITY_CODE_RE.is_match(text)
}

/// Exactly 11 digits.
pub fn is_national_id(text: &str) -> bool {
    NATIONAL_ID_RE.is_match(text)
}

/// Check one scorecard sheet against its kind's layout.
///
/// Checks, in order: the sheet has rows and columns; the identity code cell (free-form
/// layouts); required form cells are non-empty; the national ID cell holds 11 digits; the
/// compensation cells hold numbers (or are empty when `allow_empty_compensation`).
pub fn check_sheet_structure(
    sheet: &Sheet,
    profile: &KindProfile,
    allow_empty_compensation: bool,
) -> IntakeResult<()> {
    if sheet.is_empty() {
        return Err(IntakeError::EmptySheet {
            sheet: sheet.name.clone(),
        });
    }

    if let Some(at) = profile.cells.get(FormField::IdentityCode) {
        let value = sheet.cell_or_null(at).to_text();
        if !is_identity_code(value.trim()) {
            return Err(IntakeError::MalformedIdentityCell {
                sheet: sheet.name.clone(),
                value,
            });
        }
    }

    for (_, at) in profile.required_form_cells() {
        if sheet.cell_or_null(at).is_empty() {
            return Err(malformed(sheet, at, "is empty"));
        }
    }

    if let Some(at) = profile.cells.get(FormField::NationalId) {
        if !is_national_id(sheet.cell_or_null(at).to_text().trim()) {
            return Err(malformed(sheet, at, "must contain an 11-digit national id"));
        }
    }

    for (_, at) in profile.compensation_cells() {
        let value = sheet.cell_or_null(at);
        let ok = value.is_number() || (allow_empty_compensation && value.is_empty());
        if !ok {
            return Err(malformed(sheet, at, "must hold a number"));
        }
    }

    Ok(())
}

fn malformed(sheet: &Sheet, at: CellRef, problem: &str) -> IntakeError {
    IntakeError::MalformedFormCell {
        sheet: sheet.name.clone(),
        cell: at.to_string(),
        problem: problem.to_string(),
        value: sheet.cell_or_null(at).to_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorecard::SubmissionKind;
    use crate::types::Value;

    fn form_sheet(national_id: Value, k3: Value) -> Sheet {
        let mut row = |label: &str, b: Value, k: Value| {
            let mut r = vec![Value::from(label), b];
            r.resize(10, Value::Null);
            r.push(k);
            r
        };
        Sheet::new(
            "Perez",
            vec![
                row("Cargo", Value::from("Jefe de Taller"), Value::Float64(1000.0)),
                row("CUIL", national_id, Value::Int64(2)),
                row("Segmento", Value::from("Postventa"), k3),
                row("Área", Value::from("Taller"), Value::Float64(0.0)),
                row("", Value::Null, Value::Float64(-50.5)),
            ],
        )
    }

    #[test]
    fn identity_code_pattern() {
        assert!(is_identity_code("Gerente.Comercial_Jujuy_20301508493"));
        assert!(!is_identity_code("Gerente_Jujuy_123"));
        assert!(!is_identity_code("Gerente_Jujuy_203015084931"));
        assert!(!is_identity_code("GerenteJujuy_20301508493"));
        assert!(!is_identity_code("Gerente_San_Salvador_20301508493"));
    }

    #[test]
    fn free_form_sheet_reports_the_offending_identity_value() {
        let profile = KindProfile::for_kind(SubmissionKind::Leaders);
        let ok = Sheet::new("H1", vec![vec![Value::from("Gerente.Comercial_Jujuy_20301508493")]]);
        assert!(check_sheet_structure(&ok, &profile, false).is_ok());

        let bad = Sheet::new("H1", vec![vec![Value::from("Gerente_Jujuy_123")]]);
        let err = check_sheet_structure(&bad, &profile, false).unwrap_err();
        assert!(matches!(err, IntakeError::MalformedIdentityCell { ref value, .. } if value == "Gerente_Jujuy_123"));
    }

    #[test]
    fn empty_sheet_is_rejected_first() {
        let profile = KindProfile::for_kind(SubmissionKind::Form);
        let err = check_sheet_structure(&Sheet::new("Vacia", vec![]), &profile, false).unwrap_err();
        assert!(matches!(err, IntakeError::EmptySheet { .. }));
    }

    #[test]
    fn form_accepts_numeric_national_id_and_numeric_compensation() {
        let profile = KindProfile::for_kind(SubmissionKind::Form);
        let sheet = form_sheet(Value::Float64(20301508493.0), Value::Float64(3.0));
        assert!(check_sheet_structure(&sheet, &profile, false).is_ok());
    }

    #[test]
    fn form_names_the_bad_cell() {
        let profile = KindProfile::for_kind(SubmissionKind::Form);

        let err = check_sheet_structure(&form_sheet(Value::from("2030"), Value::Float64(1.0)), &profile, false)
            .unwrap_err();
        assert!(matches!(err, IntakeError::MalformedFormCell { ref cell, .. } if cell == "B2"));

        let err = check_sheet_structure(&form_sheet(Value::Null, Value::Float64(1.0)), &profile, false)
            .unwrap_err();
        assert!(err.to_string().contains("cell B2"));
        assert!(err.to_string().contains("is empty"));

        let err = check_sheet_structure(
            &form_sheet(Value::from("20301508493"), Value::from("tres")),
            &profile,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, IntakeError::MalformedFormCell { ref cell, .. } if cell == "K3"));
    }

    #[test]
    fn empty_compensation_is_allowed_only_when_configured() {
        let profile = KindProfile::for_kind(SubmissionKind::Form);
        let sheet = form_sheet(Value::from("20301508493"), Value::Null);
        assert!(check_sheet_structure(&sheet, &profile, false).is_err());
        assert!(check_sheet_structure(&sheet, &profile, true).is_ok());
    }

    #[test]
    fn sellers_sheet_requires_national_id_in_b1() {
        let profile = KindProfile::for_kind(SubmissionKind::Sellers);
        let ok = Sheet::new("V1", vec![vec![Value::from("CUIL"), Value::from("27123456789")]]);
        assert!(check_sheet_structure(&ok, &profile, false).is_ok());
        let bad = Sheet::new("V1", vec![vec![Value::from("CUIL"), Value::from("27-12345678-9")]]);
        let err = check_sheet_structure(&bad, &profile, false).unwrap_err();
        assert!(matches!(err, IntakeError::MalformedFormCell { ref cell, .. } if cell == "B1"));
    }
}
