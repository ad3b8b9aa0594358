//! Request bodies accepted by the narrator and gateway services.

use serde::{Deserialize, Serialize};

/// One character in an `/initialize` request, bound positionally to the
/// narrator's agent roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInit {
    pub agent_id: i32,
    pub name: String,
    pub init_prompt: String,
}

/// `POST /initialize` on the narrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeRequest {
    pub player_id: i64,
    pub narrator_prompt: String,
    pub characters: Vec<CharacterInit>,
}

/// `POST /action` on the narrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub player_id: i64,
    pub player_action: String,
}

/// `POST /init` on the gateway: seed one agent's scene-setting context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitContextRequest {
    pub agent_address: String,
    pub initial_context: String,
}

/// `POST /send-message` on the gateway: fan one message out to many agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub sender: String,
    pub recipients: Vec<String>,
    pub message: String,
}

/// `POST /query` on one agent process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQueryRequest {
    pub message: String,
}
