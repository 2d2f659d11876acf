//! Upload filename grammar: `DD-MM-YYYY+<branch>+<submitter>.xlsx`.
//!
//! The filename is the only place the declared period, branch and submitter (leader) come from.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{IntakeError, IntakeResult};

/// Separator between the filename segments.
pub const SEPARATOR: char = '+';
/// Required (case-sensitive) extension.
pub const EXTENSION: &str = ".xlsx";
/// Format of the period segment.
pub const PERIOD_FORMAT: &str = "%d-%m-%Y";

static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}-\d{2}-\d{4}\+[^+]+\+[^+]+\.xlsx$").expect("filename pattern is valid")
});

/// The parts declared by a valid upload filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionName {
    /// The name exactly as uploaded.
    pub original: String,
    /// Declared period.
    pub period: NaiveDate,
    /// The literal `DD-MM-YYYY` segment, kept verbatim for output and duplicate matching.
    pub period_text: String,
    /// Branch segment, verbatim.
    pub branch: String,
    /// Submitter (leader) segment, without the extension.
    pub submitter: String,
}

impl SubmissionName {
    /// Filename without its extension; used to derive output keys.
    pub fn stem(&self) -> &str {
        self.original
            .strip_suffix(EXTENSION)
            .unwrap_or(&self.original)
    }
}

/// Lenient split of a filename into `(period, branch, submitter)` text.
///
/// Every field is `None` unless the name has exactly three `+`-separated segments.
pub fn split_parts(filename: &str) -> (Option<&str>, Option<&str>, Option<&str>) {
    let parts: Vec<&str> = filename.split(SEPARATOR).collect();
    match parts.as_slice() {
        [period, branch, submitter] => (
            Some(*period),
            Some(*branch),
            Some(submitter.strip_suffix(EXTENSION).unwrap_or(*submitter)),
        ),
        _ => (None, None, None),
    }
}

/// Validate the filename grammar and extract its parts.
pub fn parse_filename(filename: &str) -> IntakeResult<SubmissionName> {
    let invalid = || IntakeError::InvalidFilenameFormat {
        filename: filename.to_string(),
    };
    if !FILENAME_RE.is_match(filename) {
        return Err(invalid());
    }

    let (Some(period_text), Some(branch), Some(submitter)) = split_parts(filename) else {
        return Err(invalid());
    };
    let period = NaiveDate::parse_from_str(period_text, PERIOD_FORMAT).map_err(|_| invalid())?;

    Ok(SubmissionName {
        original: filename.to_string(),
        period,
        period_text: period_text.to_string(),
        branch: branch.to_string(),
        submitter: submitter.to_string(),
    })
}

/// Only scorecards for the month immediately before `today`'s month are accepted.
///
/// The current month, any future month, and anything two or more months back are rejected,
/// across year boundaries.
pub fn check_period_window(period: NaiveDate, today: NaiveDate) -> IntakeResult<()> {
    let month_index = |d: NaiveDate| i64::from(d.year()) * 12 + i64::from(d.month0());
    if month_index(today) - month_index(period) == 1 {
        Ok(())
    } else {
        Err(IntakeError::OutOfWindowSubmission {
            period: period.format("%m/%Y").to_string(),
            current: today.format("%m/%Y").to_string(),
        })
    }
}
