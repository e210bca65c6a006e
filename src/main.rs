use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chunkmill")]
#[command(
    version,
    about = "AI-annotated Markdown chunk generator for RAG ingestion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk source files into annotated Markdown
    Chunk {
        #[arg(long, short, help = "Source directory or single file")]
        source: Option<PathBuf>,
        #[arg(long, short, help = "Directory to write Markdown chunks")]
        output: Option<PathBuf>,
        #[arg(long, help = "Annotation model name")]
        model: Option<String>,
        #[arg(long, help = "Max annotation attempts per file")]
        retries: Option<u32>,
        #[arg(long, help = "Seconds to wait between attempts")]
        delay: Option<f64>,
        #[arg(long, help = "Path for the summary JSON index")]
        index: Option<PathBuf>,
        #[arg(long, help = "Skip building the summary index")]
        no_index: bool,
        #[arg(long, help = "Keep existing chunk files at run start")]
        keep_output: bool,
        #[arg(long, help = "Skip files whose chunk is already annotated")]
        skip_existing: bool,
    },

    /// Rebuild the summary index from existing chunks
    Index {
        #[arg(help = "Directory containing markdown chunks")]
        chunks: PathBuf,
        #[arg(help = "Path to save the JSON index")]
        output: PathBuf,
    },

    /// Validate existing chunks for required sections
    Validate {
        #[arg(help = "Directory containing markdown chunks")]
        chunks: PathBuf,
    },

    /// Check that the annotation service is reachable
    Check {
        #[arg(long, help = "Model to probe instead of the configured one")]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the merged effective configuration
    Show,
    /// Show configuration file paths
    Path,
    /// Write a default project config file
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mchunkmill encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        eprintln!("\n\x1b[33mPlease report this issue at:\x1b[0m");
        eprintln!("  https://github.com/user/chunkmill/issues");
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = chunkmill::ConfigLoader::load()?;

    match cli.command {
        Commands::Chunk {
            source,
            output,
            model,
            retries,
            delay,
            index,
            no_index,
            keep_output,
            skip_existing,
        } => {
            use chunkmill::cli::commands::chunk::{self, ChunkOptions};

            let report = chunk::run(
                &config,
                ChunkOptions {
                    source,
                    output,
                    model,
                    retries,
                    delay,
                    index,
                    no_index,
                    keep_output,
                    skip_existing,
                },
            )?;

            Ok(if report.all_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Index { chunks, output } => {
            chunkmill::cli::commands::index::run(&chunks, &output)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { chunks } => {
            let all_valid = chunkmill::cli::commands::validate::run(&chunks)?;
            Ok(if all_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Check { model } => {
            let available = chunkmill::cli::commands::check::run(&config, model)?;
            Ok(if available {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => chunkmill::cli::commands::config::show(&config)?,
                ConfigAction::Path => chunkmill::cli::commands::config::path()?,
                ConfigAction::Init { force } => chunkmill::cli::commands::config::init(force)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
