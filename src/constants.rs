//! Global Constants
//!
//! Centralized defaults for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Annotation service constants
pub mod llm {
    /// Default Ollama endpoint
    pub const DEFAULT_API_BASE: &str = "http://localhost:11434";

    /// Default annotation model
    pub const DEFAULT_MODEL: &str = "pattern-rag-gen:latest";

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Default sampling temperature (0.0 = deterministic)
    pub const DEFAULT_TEMPERATURE: f32 = 0.0;
}

/// Retry orchestration constants
pub mod pipeline {
    /// Maximum annotation attempts per source file
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Fixed delay between attempts (seconds)
    pub const DEFAULT_RETRY_DELAY_SECS: f64 = 1.0;
}

/// Source enumeration constants
pub mod source {
    /// The only source extension this pipeline processes
    pub const EXTENSION: &str = "py";

    /// Default source root
    pub const DEFAULT_ROOT: &str = "patterns";

    /// Directories never worth walking into
    pub const SKIP_DIRS: &[&str] = &[
        ".git",
        "__pycache__",
        ".venv",
        "venv",
        "node_modules",
        "target",
        "build",
        "dist",
    ];
}

/// Output artifact names
pub mod output {
    /// Default chunk output directory
    pub const DEFAULT_CHUNKS_DIR: &str = "chunks";

    /// Default summary index path
    pub const DEFAULT_INDEX_FILE: &str = "summary_index.json";

    /// Shared failure log, one line per abandoned file
    pub const FAILURE_LOG: &str = "failed_chunks.log";
}
