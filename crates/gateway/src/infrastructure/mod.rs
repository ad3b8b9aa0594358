//! Infrastructure - registry, dispatch, and external service adapters.

pub mod agent_client;
pub mod dispatch;
pub mod llm;
pub mod registry;

pub use agent_client::{AgentQueryError, AgentQueryPort, HttpAgentClient};
pub use dispatch::{DispatchConfig, FanoutDispatcher};
pub use llm::{ChatClient, ChatConfig, LlmError};
pub use registry::ContextRegistry;
