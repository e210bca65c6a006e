//! Chunk Command
//!
//! Runs the full pipeline: enumerate → extract → annotate → write →
//! validate per file, then rebuilds the summary index over the finished
//! chunk directory.

use std::path::PathBuf;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::ai::{ServiceConfig, create_service};
use crate::cli::output::Output;
use crate::config::Config;
use crate::indexer;
use crate::pipeline::{ChunkContext, ChunkPipeline, PipelineOptions, PipelineReport};
use crate::types::{ChunkError, Result};

/// CLI overrides for one chunk run; `None` falls back to configuration.
#[derive(Debug, Default)]
pub struct ChunkOptions {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub model: Option<String>,
    pub retries: Option<u32>,
    pub delay: Option<f64>,
    pub index: Option<PathBuf>,
    pub no_index: bool,
    pub keep_output: bool,
    pub skip_existing: bool,
}

pub fn run(config: &Config, opts: ChunkOptions) -> Result<PipelineReport> {
    let source_root = opts.source.unwrap_or_else(|| config.source.root.clone());
    let output_dir = opts.output.unwrap_or_else(|| config.output.chunks_dir.clone());
    let index_path = opts.index.unwrap_or_else(|| config.output.index_path.clone());

    let mut service_config = ServiceConfig::from(&config.llm);
    if let Some(model) = opts.model {
        service_config.model = model;
    }
    let service = create_service(&service_config)?;

    let max_retries = opts.retries.unwrap_or(config.pipeline.max_retries);
    if max_retries == 0 {
        return Err(ChunkError::Config(
            "retries must be at least 1".to_string(),
        ));
    }

    let delay_secs = opts.delay.unwrap_or(config.pipeline.retry_delay_secs);
    if !delay_secs.is_finite() || delay_secs < 0.0 {
        return Err(ChunkError::Config(format!(
            "delay must be a non-negative number, got {}",
            delay_secs
        )));
    }

    let options = PipelineOptions {
        max_retries,
        retry_delay: Duration::from_secs_f64(delay_secs),
        source_extension: config.source.extension.clone(),
        keep_output: opts.keep_output,
        skip_existing: opts.skip_existing,
    };

    let out = Output::new();
    out.info(&format!(
        "chunking {} -> {} (model: {})",
        source_root.display(),
        output_dir.display(),
        service.model()
    ));

    let pipeline = ChunkPipeline::new(
        ChunkContext::new(&source_root, &output_dir),
        service,
        options,
    );

    let rt = Runtime::new()?;
    let report = rt.block_on(pipeline.run())?;

    print_summary(&out, &report);

    if !opts.no_index {
        let entries = indexer::build_index(&output_dir)?;
        indexer::write_index(&entries, &index_path)?;
        out.success(&format!(
            "summary index written: {} ({} entries)",
            index_path.display(),
            entries.len()
        ));
    }

    Ok(report)
}

fn print_summary(out: &Output, report: &PipelineReport) {
    println!();
    println!(
        "  {} processed, {} succeeded, {} skipped, {} abandoned",
        report.processed,
        report.succeeded,
        report.skipped,
        report.abandoned.len()
    );

    if report.all_ok() {
        out.success("all files processed successfully");
    } else {
        for rel in &report.abandoned {
            out.warning(&format!("abandoned: {}", rel));
        }
        out.warning(&format!(
            "{} file(s) failed; see {}",
            report.abandoned.len(),
            report.failure_log.display()
        ));
    }
}
