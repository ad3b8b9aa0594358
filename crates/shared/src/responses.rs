//! Response bodies produced by the narrator and gateway services.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `POST /action` result: the winning character's id and response text.
///
/// `agent_id` is `-1` when every agent stayed silent and the fixed silence
/// narration is returned instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub agent_id: i32,
    pub message: String,
}

/// `POST /init` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitContextResponse {
    pub status: String,
    pub message: String,
}

/// One agent's raw reply inside a `/send-message` result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub text: String,
}

/// `POST /send-message` result: one entry per recipient, keyed by address.
///
/// Every recipient always has an entry; agents that timed out or failed are
/// recorded with the silence sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub status: String,
    pub results: HashMap<String, AgentReply>,
}

/// `POST /query` reply from one agent process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQueryResponse {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_message_response_wire_shape() {
        let mut results = HashMap::new();
        results.insert(
            "agent-guard".to_string(),
            AgentReply {
                text: "Guard raises alarm".to_string(),
            },
        );
        let response = SendMessageResponse {
            status: "completed".to_string(),
            results,
        };

        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(
            json["results"]["agent-guard"]["text"],
            "Guard raises alarm"
        );
        assert_eq!(json["status"], "completed");
    }

    #[test]
    fn action_response_round_trips() {
        let parsed: ActionResponse =
            serde_json::from_str(r#"{"agent_id":-1,"message":"*The room became filled with silence*"}"#)
                .expect("deserialize");
        assert_eq!(parsed.agent_id, -1);
    }
}
