//! Per-player session state: character bindings and the transcript.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{AgentAddress, CharacterId, PlayerId};

/// Placeholder in the narrator prompt replaced with the joined transcript.
pub const ACTION_HISTORY_PLACEHOLDER: &str = "{action_history}";

/// Placeholder in the narrator prompt replaced with the candidate lines.
pub const AGENT_RESPONSES_PLACEHOLDER: &str = "{agent_responses}";

/// Ties one agent process to its in-game character.
///
/// Established once at session initialization. The display name is the value
/// arbitration matches against, so it must be unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterBinding {
    pub address: AgentAddress,
    pub character_id: CharacterId,
    pub name: String,
}

impl CharacterBinding {
    pub fn new(
        address: AgentAddress,
        character_id: CharacterId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            address,
            character_id,
            name: name.into(),
        }
    }
}

/// One active player's narrative state.
///
/// The transcript is an ordered, append-only log: one entry per accepted
/// player action and one per winning agent response. Sessions live for the
/// process lifetime; there is no teardown.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    player_id: PlayerId,
    narrator_prompt: String,
    characters: Vec<CharacterBinding>,
    transcript: Vec<String>,
}

impl PlayerSession {
    /// Create a session, validating that character display names are unique.
    ///
    /// Duplicate names would make arbitration-by-name ambiguous, so they are
    /// rejected here rather than resolved to whichever agent bound first.
    pub fn new(
        player_id: PlayerId,
        narrator_prompt: impl Into<String>,
        characters: Vec<CharacterBinding>,
    ) -> Result<Self, DomainError> {
        for (i, binding) in characters.iter().enumerate() {
            if binding.name.trim().is_empty() {
                return Err(DomainError::validation("Character name cannot be empty"));
            }
            if characters[..i].iter().any(|c| c.name == binding.name) {
                return Err(DomainError::DuplicateCharacterName(binding.name.clone()));
            }
        }

        Ok(Self {
            player_id,
            narrator_prompt: narrator_prompt.into(),
            characters,
            transcript: Vec::new(),
        })
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn characters(&self) -> &[CharacterBinding] {
        &self.characters
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Find the binding for one agent, if it belongs to this session.
    pub fn binding_for(&self, address: &AgentAddress) -> Option<&CharacterBinding> {
        self.characters.iter().find(|c| &c.address == address)
    }

    /// Record the player's action.
    pub fn append_action(&mut self, action: impl Into<String>) {
        self.transcript.push(action.into());
    }

    /// Record a winning character response as `"{name}: {response}"`.
    pub fn append_response(&mut self, name: &str, response: &str) {
        self.transcript.push(format!("{name}: {response}"));
    }

    /// The full dialogue history, one entry per line.
    pub fn history(&self) -> String {
        self.transcript.join("\n")
    }

    /// Render the arbitration prompt from the session's narrator template.
    ///
    /// Substitutes the joined transcript and the pre-rendered candidate
    /// lines into their placeholders.
    pub fn arbitration_prompt(&self, candidate_lines: &str) -> String {
        self.narrator_prompt
            .replace(ACTION_HISTORY_PLACEHOLDER, &self.history())
            .replace(AGENT_RESPONSES_PLACEHOLDER, candidate_lines)
    }
}
