//! Ollama Annotation Service
//!
//! Client for a locally-running Ollama chat endpoint. Each annotation is a
//! fixed two-message exchange: the system instruction plus the code payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{AnnotationService, ServiceConfig};
use crate::ai::prompt::SYSTEM_PROMPT;
use crate::ai::response::parse_annotation;
use crate::types::{Annotation, ChunkError, Result};

#[derive(Debug)]
pub struct OllamaService {
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OllamaService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let api_base = Self::validate_endpoint(&config.api_base)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChunkError::service(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base,
            model: config.model,
            temperature: config.temperature,
            client,
        })
    }

    /// Validate endpoint URL for security (SSRF prevention)
    ///
    /// Only allows http/https schemes and warns for non-localhost endpoints.
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            ChunkError::Config(format!("invalid Ollama endpoint URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ChunkError::Config(format!(
                "Ollama endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if let Some(host) = url.host_str()
            && !matches!(host, "localhost" | "127.0.0.1" | "::1")
        {
            warn!(
                "Ollama endpoint is not localhost: {}. Ensure this is intentional.",
                host
            );
        }

        // Remove trailing slash for consistency
        let mut result = url.to_string();
        if result.ends_with('/') {
            result.pop();
        }
        Ok(result)
    }

    fn build_request(&self, code: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: code.trim().to_string(),
                },
            ],
            stream: false,
            format: Some("json".to_string()),
            options: Some(ChatOptions {
                temperature: self.temperature,
            }),
        }
    }
}

#[async_trait]
impl AnnotationService for OllamaService {
    async fn annotate(&self, code: &str) -> Result<Annotation> {
        debug!(model = %self.model, "sending annotation request");

        let url = format!("{}/api/chat", self.api_base);
        let request = self.build_request(code);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ChunkError::service(format!(
                        "failed to connect to Ollama at {}. Is Ollama running? Start with: ollama serve",
                        self.api_base
                    ))
                } else {
                    ChunkError::service(format!("Ollama request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChunkError::service(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChunkError::service(format!("failed to read Ollama response: {}", e)))?;

        if let (Some(prompt), Some(eval)) = (body.prompt_eval_count, body.eval_count) {
            debug!(
                prompt_tokens = prompt,
                completion_tokens = eval,
                "token usage"
            );
        }

        parse_annotation(&body.message.content)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.api_base);

        let response = self.client.get(&url).send().await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                if let Ok(tags) = resp.json::<TagsResponse>().await {
                    let model_available = tags.models.iter().any(|m| {
                        m.name == self.model
                            || m.name.starts_with(&self.model.replace(":latest", ""))
                    });

                    if model_available {
                        info!("Ollama is available with model: {}", self.model);
                        Ok(true)
                    } else {
                        warn!(
                            "Ollama is running but model '{}' not found. Pull with: ollama pull {}",
                            self.model, self.model
                        );
                        Ok(false)
                    }
                } else {
                    info!("Ollama is available");
                    Ok(true)
                }
            }
            Ok(resp) => {
                warn!("Ollama API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Ollama not available: {}. Start with: ollama serve", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatContent,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<TaggedModel>,
}

#[derive(Debug, Deserialize)]
struct TaggedModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let service =
            OllamaService::new(ServiceConfig::default()).expect("Failed to create service");
        assert_eq!(service.api_base, "http://localhost:11434");
        assert_eq!(service.model(), "pattern-rag-gen:latest");
        assert_eq!(service.name(), "ollama");
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let config = ServiceConfig {
            api_base: "file:///etc/passwd".to_string(),
            ..Default::default()
        };
        let err = OllamaService::new(config).unwrap_err();
        assert!(matches!(err, ChunkError::Config(_)));
    }

    #[test]
    fn test_strips_trailing_slash() {
        let config = ServiceConfig {
            api_base: "http://localhost:11434/".to_string(),
            ..Default::default()
        };
        let service = OllamaService::new(config).expect("service");
        assert_eq!(service.api_base, "http://localhost:11434");
    }

    #[test]
    fn test_request_shape() {
        let service = OllamaService::new(ServiceConfig::default()).expect("service");
        let request = service.build_request("def f():\n    pass\n");
        let json = serde_json::to_value(&request).expect("serialize");

        assert_eq!(json["model"], "pattern-rag-gen:latest");
        assert_eq!(json["stream"], false);
        assert_eq!(json["format"], "json");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "def f():\n    pass");
    }
}
