//! Annotation Layer
//!
//! Defines the `AnnotationService` capability trait and its single
//! production implementation backed by a local Ollama endpoint. A missing
//! or unknown provider is a startup configuration error, never a runtime
//! type check.

mod ollama;
pub mod prompt;
pub mod response;

pub use ollama::OllamaService;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::constants;
use crate::types::{Annotation, ChunkError, Result};

/// Shared annotation service handle
pub type SharedService = Arc<dyn AnnotationService + Send + Sync>;

// =============================================================================
// Service Configuration
// =============================================================================

/// Configuration for annotation services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Provider type (currently only "ollama")
    pub provider: String,
    /// Model identifier passed to the service
    pub model: String,
    /// Service base URL
    pub api_base: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,
}

impl Default for ServiceConfig {
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

impl From<&LlmConfig> for ServiceConfig {
    fn from(llm: &LlmConfig) -> Self {
        Self {
            provider: llm.provider.clone(),
            model: llm.model.clone(),
            api_base: llm.api_base.clone(),
            timeout_secs: llm.timeout_secs,
            temperature: llm.temperature,
        }
    }
}

// =============================================================================
// Annotation Service Trait
// =============================================================================

/// Capability interface over the external text-generation service.
#[async_trait]
pub trait AnnotationService: std::fmt::Debug + Send + Sync {
    /// Annotate one code string.
    ///
    /// A failure here is a single failed attempt; retry policy belongs to
    /// the pipeline, never to the service.
    async fn annotate(&self, code: &str) -> Result<Annotation>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier currently in use
    fn model(&self) -> &str;

    /// Check whether the service is reachable and the model is available
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared annotation service from configuration
pub fn create_service(config: &ServiceConfig) -> Result<SharedService> {
    match config.provider.as_str() {
        "ollama" => Ok(Arc::new(OllamaService::new(config.clone())?)),
        other => Err(ChunkError::Config(format!(
            "unknown annotation provider: {}. Supported: ollama",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_service_rejects_unknown_provider() {
        let config = ServiceConfig {
            provider: "gpt-from-nowhere".to_string(),
            ..Default::default()
        };
        let err = create_service(&config).unwrap_err();
        assert!(matches!(err, ChunkError::Config(_)));
    }

    #[test]
    fn test_service_config_from_llm_config() {
        let llm = LlmConfig {
            model: "codellama".to_string(),
            ..Default::default()
        };
        let config = ServiceConfig::from(&llm);
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "codellama");
        assert_eq!(config.api_base, "http://localhost:11434");
    }
}
