//! Recipient roster.
//!
//! The narrator reads the same agents config file as the gateway but only
//! needs the addresses, in file order - that order is the descending
//! character priority the arbiter's fallback relies on.

use std::path::Path;

use serde::Deserialize;
use taleweaver_domain::AgentAddress;

#[derive(Debug, Deserialize)]
struct RosterEntry {
    address: String,
}

/// Load the recipient addresses from a JSON roster file, preserving order.
pub fn load_addresses(path: impl AsRef<Path>) -> anyhow::Result<Vec<AgentAddress>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read roster {}: {e}", path.display()))?;
    let entries: Vec<RosterEntry> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid roster {}: {e}", path.display()))?;
    Ok(entries
        .into_iter()
        .map(|entry| AgentAddress::new(entry.address))
        .collect())
}
