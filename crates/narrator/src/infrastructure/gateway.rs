//! HTTP adapter for the agent-dispatch gateway.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use taleweaver_domain::AgentAddress;
use taleweaver_shared::{InitContextRequest, SendMessageRequest, SendMessageResponse};

use crate::infrastructure::ports::{DispatchError, DispatchPort};

/// Client for the gateway's `/init` and `/send-message` endpoints.
#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// `timeout` must cover a full fan-out round: the gateway itself waits up
    /// to the per-agent deadline before answering.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DispatchPort for GatewayClient {
    async fn seed_context(
        &self,
        address: &AgentAddress,
        context: &str,
    ) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(format!("{}/init", self.base_url))
            .json(&InitContextRequest {
                agent_address: address.to_string(),
                initial_context: context.to_string(),
            })
            .send()
            .await
            .map_err(|e| DispatchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::RequestFailed(format!("{status}: {body}")));
        }
        Ok(())
    }

    async fn broadcast(
        &self,
        sender: &str,
        recipients: &[AgentAddress],
        message: &str,
    ) -> Result<HashMap<AgentAddress, String>, DispatchError> {
        let response = self
            .client
            .post(format!("{}/send-message", self.base_url))
            .json(&SendMessageRequest {
                sender: sender.to_string(),
                recipients: recipients.iter().map(|a| a.to_string()).collect(),
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| DispatchError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::RequestFailed(format!("{status}: {body}")));
        }

        let body: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::InvalidResponse(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .map(|(address, reply)| (AgentAddress::new(address), reply.text))
            .collect())
    }
}
