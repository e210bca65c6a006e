//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/chunkmill/) and project (.chunkmill/) level
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Source enumeration settings
    pub source: SourceConfig,

    /// Chunk and index output settings
    pub output: OutputConfig,

    /// Annotation service settings
    pub llm: LlmConfig,

    /// Retry orchestration settings
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ChunkError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(crate::types::ChunkError::Config(format!(
                "llm temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(crate::types::ChunkError::Config(
                "llm timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.max_retries == 0 {
            return Err(crate::types::ChunkError::Config(
                "pipeline max_retries must be at least 1".to_string(),
            ));
        }

        if !self.pipeline.retry_delay_secs.is_finite() || self.pipeline.retry_delay_secs < 0.0 {
            return Err(crate::types::ChunkError::Config(format!(
                "pipeline retry_delay_secs must be a non-negative number, got {}",
                self.pipeline.retry_delay_secs
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Source Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory (or single file) of source files to chunk
    pub root: PathBuf,

    /// Source extension accepted by the enumerator
    pub extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(constants::source::DEFAULT_ROOT),
            extension: constants::source::EXTENSION.to_string(),
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory to write Markdown chunks
    pub chunks_dir: PathBuf,

    /// Path for the summary JSON index
    pub index_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chunks_dir: PathBuf::from(constants::output::DEFAULT_CHUNKS_DIR),
            index_path: PathBuf::from(constants::output::DEFAULT_INDEX_FILE),
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type (currently only "ollama")
    pub provider: String,

    /// Model name passed to the service
    pub model: String,

    /// Service base URL
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: constants::llm::DEFAULT_MODEL.to_string(),
            api_base: constants::llm::DEFAULT_API_BASE.to_string(),
            timeout_secs: constants::llm::DEFAULT_TIMEOUT_SECS,
            temperature: constants::llm::DEFAULT_TEMPERATURE,
        }
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum annotation attempts per source file
    pub max_retries: u32,

    /// Fixed delay between attempts, in seconds
    pub retry_delay_secs: f64,
}

impl PipelineConfig {
    /// Inter-attempt delay as a `Duration`. Callers must run
    /// `Config::validate()` first; negative values are clamped to zero
    /// rather than panicking.
    pub fn retry_delay(&self) -> Duration {
        if self.retry_delay_secs.is_finite() && self.retry_delay_secs > 0.0 {
            Duration::from_secs_f64(self.retry_delay_secs)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: constants::pipeline::DEFAULT_MAX_RETRIES,
            retry_delay_secs: constants::pipeline::DEFAULT_RETRY_DELAY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.model, "pattern-rag-gen:latest");
        assert_eq!(config.pipeline.max_retries, 3);
    }

    #[test]
    fn test_rejects_zero_retries() {
        let mut config = Config::default();
        config.pipeline.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_delay() {
        let mut config = Config::default();
        config.pipeline.retry_delay_secs = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_conversion() {
        let pipeline = PipelineConfig {
            max_retries: 3,
            retry_delay_secs: 0.5,
        };
        assert_eq!(pipeline.retry_delay(), Duration::from_millis(500));

        let zero = PipelineConfig {
            max_retries: 3,
            retry_delay_secs: 0.0,
        };
        assert_eq!(zero.retry_delay(), Duration::ZERO);
    }
}
