//! Port traits for the narrator's external collaborators.
//!
//! Two seams only: the completion service that arbitrates, and the gateway
//! that reaches the agents. Everything else is concrete types.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use taleweaver_domain::AgentAddress;

/// The completion service was unreachable or returned unusable content.
///
/// Callers never surface this to the player; the arbiter absorbs it with its
/// deterministic fallback.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Dispatch request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid dispatch response: {0}")]
    InvalidResponse(String),
}

/// Single synchronous call to the text-completion endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionPort: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// The agent-dispatch layer: context seeding and fan-out broadcast.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchPort: Send + Sync {
    /// Seed one agent's scene-setting context.
    async fn seed_context(
        &self,
        address: &AgentAddress,
        context: &str,
    ) -> Result<(), DispatchError>;

    /// Broadcast `message` to every recipient; one entry per recipient comes
    /// back (silence sentinel standing in for timeouts and failures).
    async fn broadcast(
        &self,
        sender: &str,
        recipients: &[AgentAddress],
        message: &str,
    ) -> Result<HashMap<AgentAddress, String>, DispatchError>;
}
