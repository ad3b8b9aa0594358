//! Agent roster configuration.
//!
//! Both services read the same JSON roster file (`AGENTS_CONFIG`). Entry
//! order matters: the narrator treats it as descending character priority,
//! which the arbiter's deterministic fallback relies on.

use std::path::Path;

use serde::{Deserialize, Serialize};
use taleweaver_domain::AgentAddress;

/// One configured NPC agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Human-readable name used in logs.
    pub name: String,
    /// The address recipients are keyed by.
    pub address: String,
    /// Port the hosted agent server listens on.
    pub port: u16,
    /// Query endpoint URL the dispatcher posts to.
    pub endpoint: String,
}

impl AgentConfig {
    pub fn address(&self) -> AgentAddress {
        AgentAddress::new(self.address.clone())
    }
}

/// Load the roster from a JSON file.
pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Vec<AgentConfig>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read roster {}: {e}", path.display()))?;
    let roster: Vec<AgentConfig> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid roster {}: {e}", path.display()))?;
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_roster_entries() {
        let json = r#"[
            {"name": "guard", "address": "agent-guard", "port": 8001,
             "endpoint": "http://127.0.0.1:8001/query"},
            {"name": "merchant", "address": "agent-merchant", "port": 8002,
             "endpoint": "http://127.0.0.1:8002/query"}
        ]"#;
        let roster: Vec<AgentConfig> = serde_json::from_str(json).expect("parse");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].address(), AgentAddress::new("agent-guard"));
        assert_eq!(roster[1].port, 8002);
    }
}
