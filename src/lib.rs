//! `scorecard-intake` validates uploaded performance-scorecard workbooks, reshapes them into
//! flat indicator records, and persists the result to a blob store. Rejected uploads are
//! appended to a cumulative rejection log instead.
//!
//! The primary entrypoint is [`pipeline::SubmissionPipeline::submit`], which runs one upload
//! through every stage and returns a [`pipeline::SubmissionOutcome`].
//!
//! ## Uploads
//!
//! - The filename declares the period, branch and submitter:
//!   `DD-MM-YYYY+<branch>+<submitter>.xlsx` (see [`filename`]).
//! - Only the month before the current one (in the reference timezone) is accepted.
//! - A sellers branch, or else the first sheet's layout, selects the
//!   [`scorecard::SubmissionKind`]; each kind has its own [`scorecard::KindProfile`] (fixed
//!   cells, output columns, auxiliary tables).
//!
//! ## Stages
//!
//! | Stage | Module |
//! |---|---|
//! | filename grammar + period window | [`filename`] |
//! | workbook decoding | [`workbook`] |
//! | sheet layout | [`scorecard::structure`] |
//! | identity / form fields | [`scorecard::form`] |
//! | indicator table | [`scorecard::normalize`] |
//! | weights, required indicators, dates, uniqueness | [`scorecard::rules`] |
//! | duplicates across stored submissions | [`duplicates`] |
//! | on-time vs. adjustment | [`adjustment`] |
//! | CSV output | [`records`] |
//! | rejection log | [`rejection`] |
//!
//! ## Example
//!
//! ```no_run
//! use scorecard_intake::config::IntakeConfig;
//! use scorecard_intake::pipeline::{FixedDecision, SubmissionOutcome, SubmissionPipeline, Upload};
//! use scorecard_intake::store::FsBlobStore;
//!
//! # fn main() -> Result<(), scorecard_intake::IntakeError> {
//! let store = FsBlobStore::open("./bucket")?;
//! let pipeline = SubmissionPipeline::new(store, IntakeConfig::default())?;
//!
//! let bytes = std::fs::read("01-03-2025+Jujuy+Juan_Perez.xlsx")?;
//! let upload = Upload::new("01-03-2025+Jujuy+Juan_Perez.xlsx", bytes);
//! match pipeline.submit(&upload, &FixedDecision(false)) {
//!     SubmissionOutcome::Persisted(p) => println!("stored {:?}", p.keys),
//!     SubmissionOutcome::Rejected { error, .. } => eprintln!("rejected: {error}"),
//!     SubmissionOutcome::Cancelled => eprintln!("adjustment not confirmed"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod adjustment;
pub mod clock;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod filename;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod records;
pub mod rejection;
pub mod scorecard;
pub mod store;
pub mod types;
pub mod workbook;

pub use error::{ErrorKind, IntakeError, IntakeResult};
