//! Retry Orchestrator
//!
//! Drives extract → annotate → write → validate per source file with a
//! bounded retry budget. The per-file state machine is
//! `Pending → Attempting → {Succeeded, Attempting, Abandoned}`; a file
//! either ends with a fully valid chunk on disk or with no chunk at all.
//! Files are processed sequentially in enumeration order.

mod validator;
mod writer;

pub use validator::{Section, missing_sections, validate_chunk};
pub use writer::{ChunkContext, derive_chunk_name, infer_pattern, write_chunk};

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::ai::SharedService;
use crate::analyzer::{SourceScanner, extract_declarations};
use crate::constants::output::FAILURE_LOG;
use crate::constants::pipeline::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS};
use crate::types::{ChunkError, Result, SourceFile};

// =============================================================================
// Outcomes
// =============================================================================

/// Terminal state of the per-file state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// A valid chunk exists at `chunk`.
    Succeeded { chunk: PathBuf },
    /// The file was skipped before any annotation attempt.
    Skipped { reason: SkipReason },
    /// Retry budget exhausted; the failure is logged by the run driver.
    Abandoned { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Source failed to parse
    InvalidSyntax,
    /// No top-level declarations to annotate
    NoDeclarations,
    /// An annotated chunk already exists (`--skip-existing`)
    AlreadyChunked,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::InvalidSyntax => write!(f, "invalid syntax"),
            SkipReason::NoDeclarations => write!(f, "no top-level declarations"),
            SkipReason::AlreadyChunked => write!(f, "already chunked"),
        }
    }
}

// =============================================================================
// Options & Report
// =============================================================================

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum annotation attempts per source file
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
    /// Source extension accepted by the enumerator
    pub source_extension: String,
    /// Leave pre-existing chunk files in place at run start
    pub keep_output: bool,
    /// Skip sources whose chunk already carries a summary section
    pub skip_existing: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs_f64(DEFAULT_RETRY_DELAY_SECS),
            source_extension: crate::constants::source::EXTENSION.to_string(),
            keep_output: false,
            skip_existing: false,
        }
    }
}

/// End-of-run accounting.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    /// Relative paths of abandoned files, in processing order
    pub abandoned: Vec<String>,
    /// Location of the shared failure log
    pub failure_log: PathBuf,
}

impl PipelineReport {
    pub fn all_ok(&self) -> bool {
        self.abandoned.is_empty()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

pub struct ChunkPipeline {
    ctx: ChunkContext,
    service: SharedService,
    options: PipelineOptions,
}

impl ChunkPipeline {
    pub fn new(ctx: ChunkContext, service: SharedService, options: PipelineOptions) -> Self {
        Self {
            ctx,
            service,
            options,
        }
    }

    /// Run the full batch: enumerate, chunk each file to completion, record
    /// abandonments in the failure log. Per-file failures never abort the
    /// batch; only enumeration and output-directory errors are fatal.
    pub async fn run(&self) -> Result<PipelineReport> {
        let files = SourceScanner::new(&self.ctx.source_root)
            .with_extension(self.options.source_extension.as_str())
            .scan()?;
        info!(
            "found {} source file(s) under {}",
            files.len(),
            self.ctx.source_root.display()
        );

        self.prepare_output_dir()?;

        let failure_log = self.ctx.output_dir.join(FAILURE_LOG);
        fs::write(&failure_log, "")?; // one log per run

        let mut report = PipelineReport {
            failure_log: failure_log.clone(),
            ..Default::default()
        };

        for file in &files {
            report.processed += 1;
            match self.process_file(file).await? {
                FileOutcome::Succeeded { chunk } => {
                    info!("wrote chunk: {}", chunk.display());
                    report.succeeded += 1;
                }
                FileOutcome::Skipped { reason } => {
                    debug!("skipped {}: {}", file.rel_display(), reason);
                    report.skipped += 1;
                }
                FileOutcome::Abandoned { attempts } => {
                    let rel = file.rel_display();
                    error!("gave up on {} after {} attempt(s)", rel, attempts);
                    append_failure(&failure_log, &rel)?;
                    report.abandoned.push(rel);
                }
            }
        }

        Ok(report)
    }

    /// Process one source file to a terminal outcome.
    pub async fn process_file(&self, source: &SourceFile) -> Result<FileOutcome> {
        let rel = source.rel_display();
        info!("processing {}", rel);

        let chunk_path = self.ctx.chunk_path(source);

        if self.options.skip_existing
            && chunk_path.exists()
            && fs::read_to_string(&chunk_path)?.contains("## Summary")
        {
            return Ok(FileOutcome::Skipped {
                reason: SkipReason::AlreadyChunked,
            });
        }

        let text = fs::read_to_string(&source.path)?;
        let code = match extract_declarations(&rel, &text) {
            Ok(code) => code,
            Err(err @ ChunkError::Parse { .. }) => {
                warn!("skipping {}: {}", rel, err);
                return Ok(FileOutcome::Skipped {
                    reason: SkipReason::InvalidSyntax,
                });
            }
            Err(err) => return Err(err),
        };

        if code.trim().is_empty() {
            return Ok(FileOutcome::Skipped {
                reason: SkipReason::NoDeclarations,
            });
        }

        for attempt in 1..=self.options.max_retries {
            debug!("attempt {}/{} for {}", attempt, self.options.max_retries, rel);

            match self.service.annotate(&code).await {
                Ok(annotation) => {
                    let written = write_chunk(&self.ctx, source, &code, &annotation)?;
                    let missing = validate_chunk(&written)?;
                    if missing.is_empty() {
                        return Ok(FileOutcome::Succeeded { chunk: written });
                    }
                    warn!(
                        "attempt {}: {} missing {}",
                        attempt,
                        rel,
                        format_missing(&missing)
                    );
                    // invalid chunks must not survive into the next attempt
                    remove_stale_chunk(&written)?;
                }
                Err(err) if err.is_attempt_failure() => {
                    warn!("attempt {}: annotation failed for {}: {}", attempt, rel, err);
                }
                Err(err) => return Err(err),
            }

            if attempt < self.options.max_retries && !self.options.retry_delay.is_zero() {
                tokio::time::sleep(self.options.retry_delay).await;
            }
        }

        remove_stale_chunk(&chunk_path)?;
        Ok(FileOutcome::Abandoned {
            attempts: self.options.max_retries,
        })
    }

    fn prepare_output_dir(&self) -> Result<()> {
        if !self.ctx.output_dir.exists() {
            fs::create_dir_all(&self.ctx.output_dir)?;
            return Ok(());
        }

        if self.options.keep_output {
            return Ok(());
        }

        // stale chunks from earlier runs must not leak into the index
        for entry in fs::read_dir(&self.ctx.output_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md") {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn remove_stale_chunk(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn append_failure(log: &Path, rel: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(log)?;
    writeln!(
        file,
        "{} - Failed to chunk: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        rel
    )?;
    Ok(())
}

fn format_missing(missing: &[Section]) -> String {
    missing
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Tests
// =============================================================================
