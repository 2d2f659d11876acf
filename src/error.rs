use thiserror::Error;

use crate::store::StoreError;

/// Convenience result type for intake operations.
pub type IntakeResult<T> = Result<T, IntakeError>;

/// Coarse classification of an [`IntakeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Filename or cell pattern mismatch.
    Format,
    /// Missing headers, empty sheets or data blocks, missing columns.
    Structural,
    /// Weight violations, missing indicators, bad dates, duplicate identities.
    Semantic,
    /// Cross-submission duplicate blocked.
    Conflict,
    /// Blob store unreachable, malformed stored data, unreadable workbook.
    Infrastructure,
}

/// Error type returned by every stage of the intake pipeline.
///
/// All variants are terminal for the submission being processed; none are retried.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The upload name does not follow `DD-MM-YYYY+<branch>+<submitter>.xlsx`.
    #[error(
        "filename '{filename}' does not match the required format (dd-mm-yyyy+branch+leader name.xlsx)"
    )]
    InvalidFilenameFormat { filename: String },

    /// The declared period is not the month before the current one.
    #[error(
        "filename period {period} is out of the submission window: only the month before {current} is accepted"
    )]
    OutOfWindowSubmission { period: String, current: String },

    /// A scorecard sheet has no rows or no columns.
    #[error("sheet '{sheet}' is empty or has no columns")]
    EmptySheet { sheet: String },

    /// Free-form layout: A1 is not a `<role>_<branch>_<11 digits>` code.
    #[error(
        "cell A1 in sheet '{sheet}' must look like <role>_<branch>_<11-digit national id> (found '{value}')"
    )]
    MalformedIdentityCell { sheet: String, value: String },

    /// A fixed form cell is empty, not an 11-digit id, or not a number.
    #[error("cell {cell} in sheet '{sheet}' {problem} (found '{value}')")]
    MalformedFormCell {
        sheet: String,
        cell: String,
        problem: String,
        value: String,
    },

    /// Identity fields of a fixed form could not all be read.
    #[error("the form in sheet '{sheet}' does not contain all required data")]
    IncompleteForm { sheet: String },

    /// The indicator table header row could not be located.
    #[error("header '{header}' was not found in sheet '{sheet}'")]
    HeaderNotFound { sheet: String, header: String },

    /// The indicator table has a header but no data rows.
    #[error("no data rows were found below the header in sheet '{sheet}'")]
    EmptyDataBlock { sheet: String },

    /// The workbook has no sheet to validate.
    #[error("the workbook has no scorecard sheets")]
    NoScorecardSheets,

    /// A non-empty cell lies outside the supported sheet area.
    #[error("sheet '{sheet}' has data in {cell}, outside the first {max_rows} rows and {max_cols} columns")]
    SheetTooLarge {
        sheet: String,
        cell: String,
        max_rows: usize,
        max_cols: usize,
    },

    /// Required columns are absent from a table header.
    #[error("sheet '{sheet}' is missing the following required columns: {}", .missing.join(", "))]
    MissingColumns { sheet: String, missing: Vec<String> },

    /// One or more indicators carry a weight of exactly zero.
    #[error("sheet '{sheet}' has rows with a {column} of 0% (indicators: {})", .indicators.join(", "))]
    ZeroWeightRow {
        sheet: String,
        column: String,
        indicators: Vec<String>,
    },

    /// A weight is neither a number nor numeric text.
    #[error("sheet '{sheet}' row {row}: weight '{raw}' is not a number")]
    NonNumericWeight { sheet: String, row: usize, raw: String },

    /// The weights of one identity do not sum into the configured tolerance.
    #[error(
        "the weights in sheet '{sheet}' add up to {:.2}%, expected 100% (accepted range {:.2}%..={:.2}%)",
        .sum * 100.0, .min * 100.0, .max * 100.0
    )]
    WeightSumOutOfRange {
        sheet: String,
        sum: f64,
        min: f64,
        max: f64,
    },

    /// Indicators required for the sheet's kind, role or segment are missing.
    #[error("sheet '{sheet}' is missing required indicators: {}", .missing.join(", "))]
    MissingRequiredIndicator { sheet: String, missing: Vec<String> },

    /// A "last updated" value is blank or not a `dd/mm/yyyy` date.
    #[error(
        "sheet '{sheet}' row {row}: '{column}' value '{raw}' is not a valid date (dd/mm/yyyy)"
    )]
    InvalidDateFormat {
        sheet: String,
        row: usize,
        column: String,
        raw: String,
    },

    /// A "last updated" date is later than today.
    #[error("sheet '{sheet}' row {row}: '{column}' date {date} is later than today ({today})")]
    FutureUpdateDate {
        sheet: String,
        row: usize,
        column: String,
        date: String,
        today: String,
    },

    /// The same national id is scored on more than one sheet.
    #[error("national id {national_id} appears in more than one sheet ({})", .sheets.join(", "))]
    DuplicateIdentityInSubmission {
        national_id: String,
        sheets: Vec<String>,
    },

    /// Another submitter already stored a scorecard for this national id and period.
    #[error(
        "national id {national_id} already has a scorecard for {period} uploaded by '{existing_submitter}'"
    )]
    DuplicateSubmission {
        national_id: String,
        period: String,
        existing_submitter: String,
    },

    /// Input could not be shaped into the required schema.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// The uploaded bytes are not a readable workbook.
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// CSV encoding or decoding failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`crate::config::IntakeConfig`].
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration parsed but holds inconsistent values.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The blob store rejected a read, write, list or delete.
    #[error("blob store error: {0}")]
    Store(#[from] StoreError),

    /// A previously persisted blob could not be decoded.
    #[error("stored object '{key}' is malformed: {message}")]
    MalformedStoredObject { key: String, message: String },
}

impl IntakeError {
    /// Classify the error into its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            IntakeError::InvalidFilenameFormat { .. }
            | IntakeError::OutOfWindowSubmission { .. }
            | IntakeError::MalformedIdentityCell { .. }
            | IntakeError::MalformedFormCell { .. } => ErrorKind::Format,
            IntakeError::EmptySheet { .. }
            | IntakeError::IncompleteForm { .. }
            | IntakeError::HeaderNotFound { .. }
            | IntakeError::EmptyDataBlock { .. }
            | IntakeError::NoScorecardSheets
            | IntakeError::SheetTooLarge { .. }
            | IntakeError::MissingColumns { .. }
            | IntakeError::SchemaMismatch { .. } => ErrorKind::Structural,
            IntakeError::ZeroWeightRow { .. }
            | IntakeError::NonNumericWeight { .. }
            | IntakeError::WeightSumOutOfRange { .. }
            | IntakeError::MissingRequiredIndicator { .. }
            | IntakeError::InvalidDateFormat { .. }
            | IntakeError::FutureUpdateDate { .. }
            | IntakeError::DuplicateIdentityInSubmission { .. } => ErrorKind::Semantic,
            IntakeError::DuplicateSubmission { .. } => ErrorKind::Conflict,
            IntakeError::Workbook(_)
            | IntakeError::Csv(_)
            | IntakeError::Io(_)
            | IntakeError::Config(_)
            | IntakeError::InvalidConfig { .. }
            | IntakeError::Store(_)
            | IntakeError::MalformedStoredObject { .. } => ErrorKind::Infrastructure,
        }
    }
}
