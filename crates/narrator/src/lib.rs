//! Taleweaver Narrator library.
//!
//! The story-advancing service: accepts player actions, broadcasts them to
//! every NPC agent through the gateway, and arbitrates exactly one winning
//! response per turn with a completion-service call (falling back
//! deterministically when that call fails).
//!
//! ## Structure
//!
//! - `use_cases/` - Session initialization and the per-turn arbiter
//! - `infrastructure/` - Ports plus gateway/completion adapters and the session store
//! - `api/` - HTTP entry points (`/initialize`, `/action`)
//! - `app` - Application composition
//! - `roster` - Recipient roster loaded from the shared agents config

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod roster;
pub mod use_cases;

pub use app::App;
