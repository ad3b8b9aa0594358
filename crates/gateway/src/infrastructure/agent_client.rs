//! Per-agent query transport.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use taleweaver_shared::{AgentQueryRequest, AgentQueryResponse};

#[derive(Debug, Error)]
pub enum AgentQueryError {
    #[error("Agent query failed: {0}")]
    RequestFailed(String),
    #[error("Invalid agent response: {0}")]
    InvalidResponse(String),
}

/// Transport to one agent's query endpoint.
///
/// The dispatcher owns concurrency and timeouts; implementations perform a
/// single blocking-free request and report failures, nothing more.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentQueryPort: Send + Sync {
    async fn query(&self, endpoint: &str, message: &str) -> Result<String, AgentQueryError>;
}

/// HTTP adapter posting `{"message"}` to an agent and reading `{"text"}`.
#[derive(Clone)]
pub struct HttpAgentClient {
    client: reqwest::Client,
}

impl HttpAgentClient {
    /// `timeout` is a transport-level upper bound; the dispatcher applies
    /// its own per-call deadline on top.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

#[async_trait]
impl AgentQueryPort for HttpAgentClient {
    async fn query(&self, endpoint: &str, message: &str) -> Result<String, AgentQueryError> {
        let response = self
            .client
            .post(endpoint)
            .json(&AgentQueryRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| AgentQueryError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentQueryError::RequestFailed(format!(
                "{status}: {body}"
            )));
        }

        let reply: AgentQueryResponse = response
            .json()
            .await
            .map_err(|e| AgentQueryError::InvalidResponse(e.to_string()))?;
        Ok(reply.text)
    }
}
