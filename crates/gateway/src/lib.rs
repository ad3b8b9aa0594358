//! Taleweaver Gateway library.
//!
//! The agent-side dispatch service: keeps the per-agent initial-context
//! registry, fans narrator broadcasts out to every agent concurrently, and
//! hosts the NPC agent processes themselves.
//!
//! ## Structure
//!
//! - `infrastructure/` - Registry, fan-out dispatcher, agent transport, LLM client
//! - `agents` - Hosted NPC agent runtime (one `/query` server per agent)
//! - `api/` - HTTP entry points (`/init`, `/send-message`)
//! - `app` - Application composition
//! - `roster` - agents.json roster configuration

pub mod agents;
pub mod api;
pub mod app;
pub mod infrastructure;
pub mod roster;

pub use app::App;
