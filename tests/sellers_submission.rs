mod common;

use common::{april_clock, build_workbook, HrRow, SheetSpec};

use scorecard_intake::config::IntakeConfig;
use scorecard_intake::pipeline::{FixedDecision, SubmissionOutcome, SubmissionPipeline, Upload};
use scorecard_intake::records::decode_csv;
use scorecard_intake::scorecard::schema::{ACCELERATOR_COLUMNS, NATIONAL_ID, ROLE};
use scorecard_intake::scorecard::SubmissionKind;
use scorecard_intake::store::{BlobStore, MemoryBlobStore};
use scorecard_intake::IntakeError;

const FILENAME: &str = "01-03-2025+Jujuy Vendedores+Marta_Lopez.xlsx";

fn pipeline() -> SubmissionPipeline<MemoryBlobStore> {
    SubmissionPipeline::new(MemoryBlobStore::new(), IntakeConfig::default())
        .unwrap()
        .with_clock(april_clock())
}

fn hr_rows() -> Vec<HrRow> {
    vec![
        HrRow { seller: "Ana", cuit: "27123456789", total: 1500.0 },
        HrRow { seller: "Luis", cuit: "20111222333", total: 900.5 },
    ]
}

#[test]
fn sellers_workbook_writes_main_hr_and_accelerator_tables() {
    let pipeline = pipeline();
    let bytes = build_workbook(
        &[
            SheetSpec::sellers("Ana", "27123456789"),
            SheetSpec::sellers("Luis", "20111222333"),
        ],
        Some(&hr_rows()),
    );

    let outcome = pipeline.submit(&Upload::new(FILENAME, bytes), &FixedDecision(false));
    let SubmissionOutcome::Persisted(persisted) = outcome else {
        panic!("expected persistence, got {outcome:?}");
    };
    assert_eq!(persisted.kind, SubmissionKind::Sellers);
    assert_eq!(persisted.rows, 6);

    let base = "2025-04-10_09-30-00_01-03-2025+Jujuy Vendedores+Marta_Lopez.csv";
    assert_eq!(
        persisted.keys,
        vec![
            base.to_string(),
            format!("RRHH-{base}"),
            format!("Aceleradores-{base}"),
        ]
    );

    let read = |key: &str| {
        let raw = pipeline.store().get(key).unwrap().unwrap();
        decode_csv(key, &raw).unwrap()
    };

    let main = read(base);
    assert_eq!(main.headers.len(), 21);
    let role = main.column_index(ROLE).unwrap();
    assert!(main.rows.iter().all(|r| r.get(role) == Some("Vendedor")));

    let hr = read(&format!("RRHH-{base}"));
    assert_eq!(hr.headers.get(0), Some("Sucursal"));
    assert_eq!(hr.rows.len(), 2);
    assert_eq!(hr.rows[1].get(hr.column_index("Total a liquidar").unwrap()), Some("900.5"));

    let acc = read(&format!("Aceleradores-{base}"));
    assert_eq!(acc.headers.len(), 7);
    assert_eq!(acc.headers.get(1), Some(ACCELERATOR_COLUMNS[0]));
    assert_eq!(acc.rows.len(), 2);
    let id = acc.column_index(NATIONAL_ID).unwrap();
    assert_eq!(acc.rows[0].get(id), Some("27123456789"));
    assert_eq!(acc.rows[1].get(id), Some("20111222333"));
    assert_eq!(acc.rows[0].get(6), Some("0.6"));
}

#[test]
fn without_hr_summary_only_two_tables_are_written() {
    let pipeline = pipeline();
    let bytes = build_workbook(&[SheetSpec::sellers("Ana", "27123456789")], None);
    let outcome = pipeline.submit(&Upload::new(FILENAME, bytes), &FixedDecision(false));
    let SubmissionOutcome::Persisted(persisted) = outcome else {
        panic!("expected persistence, got {outcome:?}");
    };
    assert_eq!(persisted.keys.len(), 2);
    assert!(persisted.keys[1].starts_with("Aceleradores-"));
}

#[test]
fn malformed_seller_id_rejects_the_whole_workbook() {
    let pipeline = pipeline();
    let bytes = build_workbook(
        &[
            SheetSpec::sellers("Ana", "27123456789"),
            SheetSpec::sellers("Luis", "20-11122233-3"),
        ],
        Some(&hr_rows()),
    );
    let outcome = pipeline.submit(&Upload::new(FILENAME, bytes), &FixedDecision(false));
    match outcome {
        SubmissionOutcome::Rejected { error, .. } => {
            assert!(
                matches!(error, IntakeError::MalformedFormCell { ref sheet, ref cell, .. } if sheet == "Luis" && cell == "B1"),
                "{error}"
            );
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
    // Only the rejection log exists.
    assert_eq!(pipeline.store().list("").unwrap(), vec!["Errores.txt".to_string()]);
}

#[test]
fn hr_summary_sheet_name_is_only_special_for_sellers() {
    let pipeline = pipeline();
    let bytes = build_workbook(&[SheetSpec::form("Perez", "20301508493")], Some(&hr_rows()));
    let outcome = pipeline.submit(
        &Upload::new("01-03-2025+Jujuy+Juan_Perez.xlsx", bytes),
        &FixedDecision(false),
    );
    match outcome {
        SubmissionOutcome::Rejected { error, .. } => {
            assert!(matches!(error, IntakeError::MalformedFormCell { ref sheet, .. } if sheet == "Resumen RRHH"), "{error}");
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}
