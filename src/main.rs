use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;

use scorecard_intake::config::IntakeConfig;
use scorecard_intake::observability::TracingObserver;
use scorecard_intake::pipeline::{FixedDecision, SubmissionOutcome, SubmissionPipeline, Upload};
use scorecard_intake::store::FsBlobStore;
use scorecard_intake::{logging, IntakeResult};

#[derive(Parser)]
#[command(name = "scorecard-intake")]
#[command(about = "Validate scorecard workbooks and store them as CSV records", long_about = None)]
struct Cli {
    /// Directory used as the blob store
    #[arg(long, global = true, default_value = "./bucket")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one workbook and persist it if it passes
    Submit {
        /// Workbook to upload; its file name carries the period, branch and submitter
        file: PathBuf,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Persist late adjustments instead of cancelling them
        #[arg(long)]
        confirm_adjustment: bool,
    },
    /// Print the rejection log
    Rejections {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> IntakeResult<IntakeConfig> {
    match path {
        Some(p) => IntakeConfig::from_path(p),
        None => Ok(IntakeConfig::default()),
    }
}

fn run(cli: Cli) -> IntakeResult<ExitCode> {
    let store = FsBlobStore::open(&cli.store)?;

    match cli.command {
        Commands::Submit {
            file,
            config,
            confirm_adjustment,
        } => {
            let config = load_config(config.as_deref())?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let upload = Upload::new(filename, std::fs::read(&file)?);

            let pipeline = SubmissionPipeline::new(store, config)?
                .with_observer(Arc::new(TracingObserver));
            match pipeline.submit(&upload, &FixedDecision(confirm_adjustment)) {
                SubmissionOutcome::Persisted(p) => {
                    println!(
                        "'{}' stored as {} ({} rows, {})",
                        upload.filename,
                        p.keys.join(", "),
                        p.rows,
                        p.classification.label()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                SubmissionOutcome::Rejected { error, log_error } => {
                    eprintln!("rejected: {error}");
                    if let Some(e) = log_error {
                        eprintln!("the rejection could not be logged: {e}");
                    }
                    Ok(ExitCode::FAILURE)
                }
                SubmissionOutcome::Cancelled => {
                    eprintln!(
                        "'{}' is a late adjustment; rerun with --confirm-adjustment to store it",
                        upload.filename
                    );
                    Ok(ExitCode::from(2))
                }
            }
        }
        Commands::Rejections { config } => {
            let config = load_config(config.as_deref())?;
            let pipeline = SubmissionPipeline::new(store, config)?;
            let entries = pipeline.rejection_log().entries()?;
            if entries.is_empty() {
                println!("No rejections logged.");
            }
            for e in entries {
                println!("{} {}  {}  {}", e.date, e.time, e.filename, e.error);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
