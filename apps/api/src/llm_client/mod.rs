/// Text Generator Client: the single point of entry for all text-generation calls.
///
/// No other module talks to the generator over HTTP. The pipeline only sees the
/// `TextGenerator` trait, so tests swap in a stub.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";
/// The status probe should answer quickly even when generation is slow.
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Prompt in, prose out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model listing reported by the generator, used as a liveness probe.
    async fn status(&self) -> Result<Value, LlmError>;

    /// Base URL, for log and error messages.
    fn endpoint(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    /// Absent on some error payloads; treated as empty text.
    #[serde(default)]
    response: String,
}

/// Client for an Ollama-compatible generation server.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.url(GENERATE_PATH))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generator returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        debug!(
            "Generation succeeded: model={}, {} characters",
            self.model,
            parsed.response.chars().count()
        );
        Ok(parsed.response)
    }

    async fn status(&self) -> Result<Value, LlmError> {
        let response = self
            .client
            .get(self.url(TAGS_PATH))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: "Generator not responding".to_string(),
            });
        }
        Ok(response.json().await?)
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client =
            OllamaClient::new("http://localhost:11434/", "llama3:8b", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:11434");
        assert_eq!(client.url(GENERATE_PATH), "http://localhost:11434/api/generate");
        assert_eq!(client.model(), "llama3:8b");
    }

    #[test]
    fn test_request_body_disables_streaming() {
        let body = serde_json::to_value(GenerateRequest {
            model: "llama3:8b",
            prompt: "hi",
            stream: false,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "model": "llama3:8b", "prompt": "hi", "stream": false })
        );
    }

    #[test]
    fn test_missing_response_field_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert_eq!(parsed.response, "");
    }

    #[tokio::test]
    async fn test_unreachable_generator_is_an_error_not_a_panic() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client =
            OllamaClient::new("http://127.0.0.1:9", "llama3:8b", Duration::from_secs(2)).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
