//! Submission Orchestrator.
//!
//! One upload is processed synchronously, front to back:
//!
//! `filename -> period window -> kind -> per sheet {structure -> identity -> normalize -> rules}
//!  -> cross-sheet uniqueness -> duplicate scan -> adjustment gate -> persist`
//!
//! Any failure rejects the whole submission: the error is returned to the caller, appended to
//! the rejection log and reported to the observer. Nothing is persisted unless every stage
//! passed, and a failed write removes the blobs already written for that submission.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::{debug, info, warn};

use crate::adjustment::Classification;
use crate::clock::{Clock, SystemClock};
use crate::config::IntakeConfig;
use crate::duplicates::DuplicateDetector;
use crate::error::{IntakeError, IntakeResult};
use crate::filename::{check_period_window, parse_filename, SubmissionName};
use crate::observability::{PersistStats, SubmissionContext, SubmissionObserver, SubmissionSeverity};
use crate::records::encode_csv;
use crate::rejection::RejectionLog;
use crate::scorecard::{
    check_sheet_structure, check_unique_identities, extract_accelerators, extract_hr_summary,
    extract_identity, extract_indicator_table, to_output_rows, validate_indicators,
    AcceleratorTable, KindProfile, RuleContext, SubmissionKind, SubmissionMeta,
};
use crate::store::BlobStore;
use crate::types::DataSet;
use crate::workbook::{read_workbook, Workbook};

/// Format of the upload timestamp, used in output rows and blob keys.
pub const UPLOAD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
/// Key prefix of the HR summary table.
pub const HR_SUMMARY_PREFIX: &str = "RRHH-";
/// Key prefix of the accelerators table.
pub const ACCELERATORS_PREFIX: &str = "Aceleradores-";

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Name the file was uploaded under.
    pub filename: String,
    /// Raw workbook bytes.
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// What the operator is asked to confirm when a submission is a late adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentRequest {
    /// Name the file was uploaded under.
    pub filename: String,
    /// Period declared by the filename.
    pub period: NaiveDate,
    /// Upload time in the reference timezone.
    pub uploaded_at: DateTime<FixedOffset>,
}

/// Operator decision point for late adjustments. Returning `false` cancels the submission.
pub trait AdjustmentGate {
    fn confirm(&self, request: &AdjustmentRequest) -> bool;
}

/// A gate that always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDecision(pub bool);

impl AdjustmentGate for FixedDecision {
    fn confirm(&self, _request: &AdjustmentRequest) -> bool {
        self.0
    }
}

impl<F> AdjustmentGate for F
where
    F: Fn(&AdjustmentRequest) -> bool,
{
    fn confirm(&self, request: &AdjustmentRequest) -> bool {
        self(request)
    }
}

/// A submission that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSubmission {
    /// Layout the workbook was validated against.
    pub kind: SubmissionKind,
    /// On-time submission or late adjustment.
    pub classification: Classification,
    /// Keys written, main table first.
    pub keys: Vec<String>,
    /// Rows in the main indicator table.
    pub rows: usize,
}

/// Terminal state of one submission.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Every table was written.
    Persisted(PersistedSubmission),
    /// A stage failed; nothing was written except the rejection log entry.
    Rejected {
        /// Why the submission was rejected.
        error: IntakeError,
        /// Set when the rejection could not be appended to the rejection log.
        log_error: Option<IntakeError>,
    },
    /// The operator declined to confirm an adjustment. Not logged.
    Cancelled,
}

impl SubmissionOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, SubmissionOutcome::Persisted(_))
    }
}

/// Everything derived from a workbook that passed every per-sheet and cross-sheet rule.
#[derive(Debug, Clone, PartialEq)]
struct ValidatedSubmission {
    main: DataSet,
    accelerators: Option<DataSet>,
    hr_summary: Option<DataSet>,
    national_ids: Vec<String>,
}

/// Drives submissions through validation and persistence against an injected store.
pub struct SubmissionPipeline<S: BlobStore> {
    store: S,
    config: IntakeConfig,
    clock: Arc<dyn Clock>,
    observer: Option<Arc<dyn SubmissionObserver>>,
    alert_at_or_above: SubmissionSeverity,
}

impl<S: BlobStore> fmt::Debug for SubmissionPipeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionPipeline")
            .field("config", &self.config)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl<S: BlobStore> SubmissionPipeline<S> {
    /// A pipeline on the system clock, shifted to the configured reference offset.
    pub fn new(store: S, config: IntakeConfig) -> IntakeResult<Self> {
        let clock = SystemClock::new(config.reference_offset()?);
        Ok(Self {
            store,
            config,
            clock: Arc::new(clock),
            observer: None,
            alert_at_or_above: SubmissionSeverity::Critical,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Severity at which rejections are also raised through `on_alert`.
    pub fn with_alert_threshold(mut self, severity: SubmissionSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// The cumulative rejection log of this pipeline's store.
    pub fn rejection_log(&self) -> RejectionLog<'_, S> {
        RejectionLog::new(&self.store, &self.config.rejection_log_key)
    }

    /// Process one upload to a terminal state.
    pub fn submit(&self, upload: &Upload, gate: &dyn AdjustmentGate) -> SubmissionOutcome {
        let mut ctx = SubmissionContext {
            filename: upload.filename.clone(),
            kind: None,
        };
        info!(filename = %upload.filename, bytes = upload.bytes.len(), "processing submission");

        match self.process(upload, gate, &mut ctx) {
            Ok(Some(persisted)) => {
                if let Some(o) = &self.observer {
                    o.on_persisted(
                        &ctx,
                        PersistStats {
                            rows: persisted.rows,
                            objects: persisted.keys.len(),
                        },
                    );
                }
                SubmissionOutcome::Persisted(persisted)
            }
            Ok(None) => {
                info!(filename = %upload.filename, "adjustment not confirmed; submission cancelled");
                SubmissionOutcome::Cancelled
            }
            Err(error) => self.reject(&ctx, error),
        }
    }

    fn reject(&self, ctx: &SubmissionContext, error: IntakeError) -> SubmissionOutcome {
        let severity = SubmissionSeverity::for_error(&error);
        warn!(filename = %ctx.filename, error_kind = ?error.kind(), "rejected: {error}");

        let log_error = self
            .rejection_log()
            .append(self.clock.as_ref(), &error.to_string(), &ctx.filename)
            .err();
        if let Some(e) = &log_error {
            warn!(filename = %ctx.filename, "could not append to the rejection log: {e}");
        }

        if let Some(o) = &self.observer {
            o.on_rejected(ctx, severity, &error);
            if severity >= self.alert_at_or_above {
                o.on_alert(ctx, severity, &error);
            }
        }

        SubmissionOutcome::Rejected { error, log_error }
    }

    fn process(
        &self,
        upload: &Upload,
        gate: &dyn AdjustmentGate,
        ctx: &mut SubmissionContext,
    ) -> IntakeResult<Option<PersistedSubmission>> {
        let now = self.clock.now();
        let uploaded_at_text = now.format(UPLOAD_TIMESTAMP_FORMAT).to_string();

        let name = parse_filename(&upload.filename)?;
        check_period_window(name.period, self.clock.today())?;

        debug!(filename = %name.original, branch = %name.branch, "filename accepted");

        let workbook = read_workbook(&upload.bytes)?;
        let kind = self.config.resolve_kind(&name.branch, &workbook);
        ctx.kind = Some(kind);
        let profile = KindProfile::for_kind(kind);
        debug!(filename = %name.original, kind = kind.as_str(), "kind resolved");
        let meta = SubmissionMeta {
            submitter: name.submitter.clone(),
            period_text: name.period_text.clone(),
            branch: name.branch.clone(),
            uploaded_at_text: uploaded_at_text.clone(),
        };
        let validated = self.validate_workbook(&workbook, &profile, &meta)?;

        DuplicateDetector::new(&self.store, &self.config.rejection_log_key).check(
            &validated.national_ids,
            &name.period_text,
            &name.submitter,
        )?;

        let classification = self.config.adjustment.classify(name.period, now);
        if classification == Classification::Adjustment {
            let request = AdjustmentRequest {
                filename: name.original.clone(),
                period: name.period,
                uploaded_at: now,
            };
            info!(filename = %name.original, "submission is a late adjustment; asking for confirmation");
            if !gate.confirm(&request) {
                return Ok(None);
            }
        }

        let keys = self.persist(&name, &uploaded_at_text, &validated)?;
        Ok(Some(PersistedSubmission {
            kind,
            classification,
            keys,
            rows: validated.main.row_count(),
        }))
    }

    fn validate_workbook(
        &self,
        workbook: &Workbook,
        profile: &KindProfile,
        meta: &SubmissionMeta,
    ) -> IntakeResult<ValidatedSubmission> {
        let today = self.clock.today();
        let mut main = DataSet::empty(profile.output_schema.clone());
        let mut accelerators = AcceleratorTable::new();
        let mut hr_summary = None;
        let mut identities: Vec<(String, String)> = Vec::new();

        for sheet in &workbook.sheets {
            if profile.has_hr_summary && sheet.name == self.config.hr_summary_sheet {
                let table = extract_hr_summary(sheet)?;
                debug!(sheet = %sheet.name, rows = table.row_count(), "HR summary accepted");
                hr_summary = Some(table);
                continue;
            }

            check_sheet_structure(sheet, profile, self.config.allow_empty_compensation)?;
            let identity = extract_identity(sheet, profile)?;
            let table = extract_indicator_table(sheet)?;

            let required =
                self.config
                    .required_indicators_for(profile.kind, &identity.role, &identity.segment);
            validate_indicators(
                &table,
                &RuleContext {
                    tolerance: self.config.weight_tolerance,
                    required_indicators: &required,
                    today,
                },
            )?;

            if let Some(row) = extract_accelerators(sheet, profile, &identity.national_id) {
                accelerators.push(row);
            }

            let rows = to_output_rows(&table, &identity, meta, profile)?;
            debug!(sheet = %sheet.name, rows = rows.row_count(), "sheet accepted");
            if !main.append(rows) {
                return Err(IntakeError::SchemaMismatch {
                    message: format!("sheet '{}' does not match the output layout", sheet.name),
                });
            }
            identities.push((sheet.name.clone(), identity.national_id));
        }

        if identities.is_empty() {
            return Err(IntakeError::NoScorecardSheets);
        }
        check_unique_identities(&identities)?;

        Ok(ValidatedSubmission {
            main,
            accelerators: (!accelerators.is_empty()).then(|| accelerators.into_data()),
            hr_summary,
            national_ids: identities.into_iter().map(|(_, id)| id).collect(),
        })
    }

    /// Write every table of the submission, or none of them.
    fn persist(
        &self,
        name: &SubmissionName,
        uploaded_at_text: &str,
        validated: &ValidatedSubmission,
    ) -> IntakeResult<Vec<String>> {
        let base = format!("{uploaded_at_text}_{}.csv", name.stem());
        let bom = self.config.write_bom;

        // Render everything before the first write.
        let mut blobs = vec![(base.clone(), encode_csv(&validated.main, bom)?)];
        if let Some(hr) = &validated.hr_summary {
            blobs.push((format!("{HR_SUMMARY_PREFIX}{base}"), encode_csv(hr, bom)?));
        }
        if let Some(acc) = &validated.accelerators {
            blobs.push((format!("{ACCELERATORS_PREFIX}{base}"), encode_csv(acc, bom)?));
        }

        let mut written: Vec<String> = Vec::with_capacity(blobs.len());
        for (key, bytes) in &blobs {
            if let Err(e) = self.store.put(key, bytes) {
                for done in &written {
                    if let Err(cleanup) = self.store.delete(done) {
                        warn!(key = %done, "rollback delete failed: {cleanup}");
                    }
                }
                return Err(e.into());
            }
            info!(key = %key, bytes = bytes.len(), "stored");
            written.push(key.clone());
        }
        Ok(written)
    }
}
