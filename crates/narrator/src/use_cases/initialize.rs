//! Session initialization use case.

use std::sync::Arc;

use thiserror::Error;

use taleweaver_domain::{
    AgentAddress, CharacterBinding, CharacterId, DomainError, PlayerId, PlayerSession,
};

use crate::infrastructure::ports::{DispatchError, DispatchPort};
use crate::infrastructure::sessions::SessionStore;

/// One character to bind, in roster priority order.
#[derive(Debug, Clone)]
pub struct CharacterSpec {
    pub character_id: CharacterId,
    pub name: String,
    pub init_prompt: String,
}

#[derive(Debug, Error)]
pub enum InitializeError {
    #[error("Mismatch between agents and characters: {roster} agents, {characters} characters")]
    CharacterCountMismatch { roster: usize, characters: usize },
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error("Failed to initialize agent {address}: {source}")]
    ContextSeed {
        address: AgentAddress,
        source: DispatchError,
    },
}

/// Creates one player session and seeds every agent's initial context.
///
/// Characters bind positionally to the agent roster. All validation runs
/// before anything is stored or sent, so a failed initialize leaves no
/// partial session behind.
pub struct InitializeSession {
    sessions: Arc<SessionStore>,
    roster: Vec<AgentAddress>,
    dispatch: Arc<dyn DispatchPort>,
}

impl InitializeSession {
    pub fn new(
        sessions: Arc<SessionStore>,
        roster: Vec<AgentAddress>,
        dispatch: Arc<dyn DispatchPort>,
    ) -> Self {
        Self {
            sessions,
            roster,
            dispatch,
        }
    }

    pub async fn execute(
        &self,
        player_id: PlayerId,
        narrator_prompt: String,
        characters: Vec<CharacterSpec>,
    ) -> Result<(), InitializeError> {
        if characters.len() != self.roster.len() {
            return Err(InitializeError::CharacterCountMismatch {
                roster: self.roster.len(),
                characters: characters.len(),
            });
        }

        let bindings: Vec<CharacterBinding> = self
            .roster
            .iter()
            .zip(&characters)
            .map(|(address, character)| {
                CharacterBinding::new(
                    address.clone(),
                    character.character_id,
                    character.name.clone(),
                )
            })
            .collect();

        // Validates display-name uniqueness before any side effect.
        let session = PlayerSession::new(player_id, narrator_prompt, bindings)?;

        for (address, character) in self.roster.iter().zip(&characters) {
            self.dispatch
                .seed_context(address, &character.init_prompt)
                .await
                .map_err(|source| {
                    tracing::error!(
                        agent = %address,
                        character = %character.name,
                        error = %source,
                        "Failed to initialize agent"
                    );
                    InitializeError::ContextSeed {
                        address: address.clone(),
                        source,
                    }
                })?;
        }

        self.sessions.insert(session);
        tracing::info!(player_id = %player_id, characters = characters.len(), "Session initialized");
        Ok(())
    }
}
