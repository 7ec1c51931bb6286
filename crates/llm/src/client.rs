use async_trait::async_trait;
use distill_common::{AppConfig, DistillError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::completion::CompletionService;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, CompletionRequest};

/// OpenAI-compatible chat completion client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    max_attempts: u32,
    client: Client,
}

impl OpenAiClient {
    /// Create new client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Completion client initialized: {}", base_url);
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            max_attempts: 1,
            client,
        })
    }

    /// Create client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            &config.openai_base_url,
            &config.openai_api_key,
            Duration::from_secs(config.llm_timeout_secs),
        )?
        .with_max_attempts(config.llm_max_attempts))
    }

    /// Attempts per request; 1 disables retry
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn complete_with_retry(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest::from(request);

        debug!(
            "Sending completion request - Model: {}, Prompt length: {}",
            request.model,
            request.prompt.len()
        );

        let mut attempt = 1;
        loop {
            match self.try_complete(&url, &body).await {
                Ok(text) => {
                    debug!("Received completion - Length: {}", text.len());
                    return Ok(text);
                }
                Err(e) if attempt < self.max_attempts && is_transient(&e) => {
                    let delay = Duration::from_secs(2u64.pow(attempt - 1));
                    warn!(
                        "Completion request failed (attempt {}/{}): {}. Retrying in {:?}...",
                        attempt, self.max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single attempt
    async fn try_complete(&self, url: &str, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| DistillError::network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DistillError::api(status.as_u16(), message));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DistillError::llm(format!("Failed to parse response: {}", e)))?;

        result
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| DistillError::llm("Empty completion in response"))
    }

    /// Check that the service answers
    pub async fn check_connection(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| DistillError::network(format!("Failed to connect: {}", e)))?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.complete_with_retry(&request).await
    }
}

/// Network failures, rate limits and server errors are worth another attempt
fn is_transient(error: &DistillError) -> bool {
    match error {
        DistillError::Network(_) => true,
        DistillError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}
