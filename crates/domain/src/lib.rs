//! Taleweaver Domain - Core types for narrator/agent orchestration.
//!
//! This crate holds the pure session vocabulary: identifiers, character
//! bindings, the per-player session with its transcript, and the silence
//! sentinel. No I/O, no async - invariants only.

pub mod error;
pub mod ids;
pub mod session;

pub use error::DomainError;
pub use ids::{AgentAddress, CharacterId, PlayerId};
pub use session::{CharacterBinding, PlayerSession};

/// Reserved response value meaning "this agent abstains this turn".
pub const SILENCE: &str = "silence";
