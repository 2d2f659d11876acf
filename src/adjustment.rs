//! Adjustment classification: is an upload on time, or a late adjustment that needs an
//! operator's explicit confirmation before it is persisted?

use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// How the on-time deadline is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AdjustmentPolicy {
    /// Uploads after midnight (reference time) starting `date` are adjustments. The date is an
    /// administrative deadline that is moved between processing runs.
    Cutoff { date: NaiveDate },
    /// Uploads later than the declared period plus `days` are adjustments.
    PeriodOffset { days: u32 },
}

/// Outcome of [`AdjustmentPolicy::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    OnTime,
    Adjustment,
}

impl Classification {
    /// Label used in operator-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::OnTime => "Normal",
            Classification::Adjustment => "Ajuste",
        }
    }
}

impl AdjustmentPolicy {
    /// Classify an upload. Pure: depends only on its arguments.
    pub fn classify(&self, period: NaiveDate, uploaded_at: DateTime<FixedOffset>) -> Classification {
        let deadline = match self {
            AdjustmentPolicy::Cutoff { date } => *date,
            AdjustmentPolicy::PeriodOffset { days } => period
                .checked_add_days(Days::new(u64::from(*days)))
                .unwrap_or(NaiveDate::MAX),
        };
        // Compare civil times in the upload's own offset; the deadline is midnight.
        if uploaded_at.naive_local() > deadline.and_time(chrono::NaiveTime::MIN) {
            Classification::Adjustment
        } else {
            Classification::OnTime
        }
    }
}
