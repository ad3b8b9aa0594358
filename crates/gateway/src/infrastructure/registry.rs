//! Initial-context registry.

use dashmap::DashMap;

use taleweaver_domain::AgentAddress;

/// Process-wide map from agent address to its scene-setting instructions.
///
/// Populated at session initialization, read on every dispatch, never pruned
/// during a run. A later set silently overwrites.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: DashMap<AgentAddress, String>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self {
            contexts: DashMap::new(),
        }
    }

    /// Store or overwrite one agent's initial context.
    pub fn set(&self, address: AgentAddress, context: impl Into<String>) {
        self.contexts.insert(address, context.into());
    }

    /// The stored context, or an empty string if unset. Never fails.
    pub fn get(&self, address: &AgentAddress) -> String {
        self.contexts
            .get(address)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}
