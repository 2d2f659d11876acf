//! Scorecard sheets: layouts per submission kind, and the structural, extraction,
//! normalization and business-rule stages applied to each sheet.

pub mod accelerators;
pub mod form;
pub mod hr_summary;
pub mod kind;
pub mod normalize;
pub mod rules;
pub mod schema;
pub mod structure;

pub use accelerators::{extract_accelerators, AcceleratorTable};
pub use form::{extract_form_fields, extract_identity, FormFields, SheetIdentity};
pub use hr_summary::extract_hr_summary;
pub use kind::{CellMap, FormField, KindProfile, SubmissionKind};
pub use normalize::{extract_indicator_table, to_output_rows, IndicatorTable, SubmissionMeta};
pub use rules::{check_unique_identities, validate_indicators, RuleContext};
pub use structure::check_sheet_structure;
