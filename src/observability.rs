//! Submission outcome hooks.
//!
//! The pipeline reports every terminal outcome to an optional [`SubmissionObserver`]; failures
//! at or above the configured severity are additionally raised through `on_alert`.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{ErrorKind, IntakeError};
use crate::scorecard::SubmissionKind;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SubmissionSeverity {
    /// The submission was rejected.
    Error,
    /// Infrastructure failure (store, unreadable workbook or stored data).
    Critical,
}

impl SubmissionSeverity {
    pub fn for_error(error: &IntakeError) -> Self {
        match error.kind() {
            ErrorKind::Infrastructure => SubmissionSeverity::Critical,
            _ => SubmissionSeverity::Error,
        }
    }
}

/// What is known about the submission when an event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    /// Upload filename as received.
    pub filename: String,
    /// `None` until the filename has been parsed.
    pub kind: Option<SubmissionKind>,
}

/// Stats reported for a persisted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistStats {
    /// Rows in the main indicator table.
    pub rows: usize,
    /// Blobs written.
    pub objects: usize,
}

/// Observer interface for submission outcomes.
pub trait SubmissionObserver: Send + Sync {
    fn on_persisted(&self, _ctx: &SubmissionContext, _stats: PersistStats) {}

    fn on_rejected(
        &self,
        _ctx: &SubmissionContext,
        _severity: SubmissionSeverity,
        _error: &IntakeError,
    ) {
    }

    /// Called when a rejection meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_rejected`].
    fn on_alert(&self, ctx: &SubmissionContext, severity: SubmissionSeverity, error: &IntakeError) {
        self.on_rejected(ctx, severity, error)
    }
}

/// Fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn SubmissionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn SubmissionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl SubmissionObserver for CompositeObserver {
    fn on_persisted(&self, ctx: &SubmissionContext, stats: PersistStats) {
        for o in &self.observers {
            o.on_persisted(ctx, stats);
        }
    }

    fn on_rejected(&self, ctx: &SubmissionContext, severity: SubmissionSeverity, error: &IntakeError) {
        for o in &self.observers {
            o.on_rejected(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &SubmissionContext, severity: SubmissionSeverity, error: &IntakeError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits submission outcomes as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl SubmissionObserver for TracingObserver {
    fn on_persisted(&self, ctx: &SubmissionContext, stats: PersistStats) {
        info!(
            filename = %ctx.filename,
            kind = ?ctx.kind,
            rows = stats.rows,
            objects = stats.objects,
            "submission persisted"
        );
    }

    fn on_rejected(&self, ctx: &SubmissionContext, severity: SubmissionSeverity, error: &IntakeError) {
        warn!(
            filename = %ctx.filename,
            kind = ?ctx.kind,
            ?severity,
            error_kind = ?error.kind(),
            "submission rejected: {error}"
        );
    }

    fn on_alert(&self, ctx: &SubmissionContext, severity: SubmissionSeverity, error: &IntakeError) {
        error!(
            filename = %ctx.filename,
            kind = ?ctx.kind,
            ?severity,
            "ALERT: {error}"
        );
    }
}
