//! Use cases - session initialization and the per-turn arbiter.

pub mod initialize;
pub mod selection;
pub mod turn;

pub use initialize::{CharacterSpec, InitializeError, InitializeSession};
pub use selection::{Candidate, NameSubstring, SelectionStrategy};
pub use turn::{RunTurn, TurnError, TurnOutcome, SILENCE_NARRATION};
