//! Duplicate Detector: has another submitter already sent a scorecard for this national ID
//! and period?
//!
//! This is a linear scan over every stored CSV. Store volume is small, so nothing is indexed.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{IntakeError, IntakeResult};
use crate::filename::PERIOD_FORMAT;
use crate::records::decode_csv;
use crate::scorecard::schema::{NATIONAL_ID, PERIOD, SUBMITTER};
use crate::store::BlobStore;

/// A stored row that claims the same identity key under another submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Stored blob holding the earlier submission.
    pub key: String,
    /// National id found in both submissions.
    pub national_id: String,
    /// Submitter of the stored scorecard.
    pub existing_submitter: String,
}

/// Scans the store for conflicting identity keys.
pub struct DuplicateDetector<'a, S: BlobStore + ?Sized> {
    store: &'a S,
    /// Key of the rejection log, which is never a record set.
    skip_key: &'a str,
}

impl<'a, S: BlobStore + ?Sized> DuplicateDetector<'a, S> {
    pub fn new(store: &'a S, skip_key: &'a str) -> Self {
        Self { store, skip_key }
    }

    /// First stored row whose national ID is one of `national_ids`, whose period equals
    /// `period`, and whose submitter differs from `submitter`.
    ///
    /// Stored record sets without both an ID and a period column are ignored. Resubmission by
    /// the same submitter never conflicts.
    pub fn find_conflict(
        &self,
        national_ids: &[String],
        period: &str,
        submitter: &str,
    ) -> IntakeResult<Option<Conflict>> {
        let wanted: Vec<String> = national_ids.iter().map(|id| normalize_id(id)).collect();
        let keys = self.store.list("")?;
        debug!(objects = keys.len(), "scanning stored records for duplicates");

        for key in keys
            .iter()
            .filter(|k| k.as_str() != self.skip_key && k.ends_with(".csv"))
        {
            let Some(bytes) = self.store.get(key)? else {
                // Listed but gone: deleted between list and get.
                continue;
            };
            let table = decode_csv(key, &bytes)?;
            let (Some(id_col), Some(period_col)) =
                (table.column_index(NATIONAL_ID), table.column_index(PERIOD))
            else {
                continue;
            };
            let submitter_col = table.column_index(SUBMITTER);

            for row in &table.rows {
                let id = normalize_id(row.get(id_col).unwrap_or_default());
                if !wanted.contains(&id) || !same_period(row.get(period_col).unwrap_or_default(), period)
                {
                    continue;
                }
                let existing = submitter_col
                    .and_then(|c| row.get(c))
                    .unwrap_or_default()
                    .trim();
                if existing != submitter.trim() {
                    warn!(key = %key, national_id = %id, existing_submitter = existing, "duplicate submission");
                    return Ok(Some(Conflict {
                        key: key.clone(),
                        national_id: id,
                        existing_submitter: existing.to_string(),
                    }));
                }
            }
        }
        Ok(None)
    }

    /// [`find_conflict`](Self::find_conflict) as a rejection.
    pub fn check(&self, national_ids: &[String], period: &str, submitter: &str) -> IntakeResult<()> {
        match self.find_conflict(national_ids, period, submitter)? {
            None => Ok(()),
            Some(conflict) => Err(IntakeError::DuplicateSubmission {
                national_id: conflict.national_id,
                period: period.to_string(),
                existing_submitter: conflict.existing_submitter,
            }),
        }
    }
}

/// National IDs round-trip through spreadsheets as numbers (`20301508493.0`); compare digits.
fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => trimmed.to_string(),
    }
}

fn same_period(stored: &str, period: &str) -> bool {
    let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), PERIOD_FORMAT).ok();
    match (parse(stored), parse(period)) {
        (Some(a), Some(b)) => a == b,
        _ => stored.trim() == period.trim(),
    }
}
