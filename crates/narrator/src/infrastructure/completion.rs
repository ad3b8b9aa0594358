//! Completion client (OpenAI-compatible chat API).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{CompletionError, CompletionPort};

/// Completion endpoint configuration.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub url: String,
    pub model: String,
    pub token: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request deadline. Configurable; defaults to 15s.
    pub timeout: Duration,
}

impl CompletionConfig {
    pub fn new(url: impl Into<String>, model: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model: model.into(),
            token: token.into(),
            temperature: 0.7,
            max_tokens: 8000,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the arbitration completion endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }
}

#[async_trait]
impl CompletionPort for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            stream: false,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::RequestFailed(format!("{status}: {body}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let choice = body.choices.into_iter().next().ok_or_else(|| {
            CompletionError::InvalidResponse("No choices in completion response".to_string())
        })?;
        Ok(choice.message.content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    stream: bool,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
