//! Ollama HTTP client.

use crate::error::{OllamaError, OllamaResult};
use crate::types::*;
use posterbox_config::TaggingConfig;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Client for interacting with Ollama's API.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    host: String,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a new client from configuration.
    pub fn from_config(config: &TaggingConfig) -> OllamaResult<Self> {
        Self::with_timeout(&config.host, Duration::from_secs(config.timeout_seconds))
    }

    /// Create a new client with an explicit timeout.
    pub fn with_timeout(host: impl Into<String>, timeout: Duration) -> OllamaResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(OllamaError::Http)?;

        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Server address, without trailing slash.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Check if Ollama server is available.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.host);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List the models pulled on the server.
    pub async fn list_models(&self) -> OllamaResult<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.host);
        debug!("Listing models from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let list: ListModelsResponse = Self::read_json(response, None).await?;
        Ok(list.models)
    }

    /// Check if `model` is pulled, with or without an explicit `:tag`.
    pub async fn has_model(&self, model: &str) -> OllamaResult<bool> {
        let prefix = format!("{model}:");
        Ok(self
            .list_models()
            .await?
            .iter()
            .any(|m| m.name == model || m.name.starts_with(&prefix)))
    }

    /// Run a single non-streaming generation.
    pub async fn generate(&self, mut request: GenerateRequest) -> OllamaResult<GenerateResponse> {
        let url = format!("{}/api/generate", self.host);
        debug!("Generating with model {}", request.model);
        request.stream = false;

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        Self::read_json(response, Some(&request.model)).await
    }

    /// Decode a successful response body, or turn the status into an error.
    /// A 404 (or a "not found" body) on a model request means the model is
    /// not pulled.
    async fn read_json<T: DeserializeOwned>(
        response: Response,
        model: Option<&str>,
    ) -> OllamaResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response.text().await.unwrap_or_default();
        match model {
            Some(model) if status == StatusCode::NOT_FOUND || message.contains("not found") => {
                Err(OllamaError::ModelNotFound {
                    model: model.to_string(),
                })
            }
            _ => Err(OllamaError::ApiError {
                status: status.as_u16(),
                message,
            }),
        }
    }

    fn send_error(&self, e: reqwest::Error) -> OllamaError {
        if e.is_connect() {
            OllamaError::ServerNotRunning {
                host: self.host.clone(),
            }
        } else if e.is_timeout() {
            OllamaError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            OllamaError::Http(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = TaggingConfig::default();
        let client = OllamaClient::from_config(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn test_host_trailing_slash_is_trimmed() {
        let client =
            OllamaClient::with_timeout("http://localhost:11434/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.host(), "http://localhost:11434");
    }
}
