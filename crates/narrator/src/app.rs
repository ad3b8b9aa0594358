//! Application state and composition.

use std::sync::Arc;

use taleweaver_domain::AgentAddress;

use crate::infrastructure::ports::{CompletionPort, DispatchPort};
use crate::infrastructure::sessions::SessionStore;
use crate::use_cases::{InitializeSession, NameSubstring, RunTurn};

/// Narrator application state.
///
/// Holds the session store and the two use cases. Passed to HTTP handlers
/// via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

pub struct UseCases {
    pub initialize: InitializeSession,
    pub turn: RunTurn,
}

impl App {
    /// Compose the application with the default name-substring arbitration.
    pub fn new(
        roster: Vec<AgentAddress>,
        dispatch: Arc<dyn DispatchPort>,
        completion: Arc<dyn CompletionPort>,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new());
        Self {
            use_cases: UseCases {
                initialize: InitializeSession::new(
                    sessions.clone(),
                    roster.clone(),
                    dispatch.clone(),
                ),
                turn: RunTurn::new(
                    sessions,
                    roster,
                    dispatch,
                    completion,
                    Arc::new(NameSubstring),
                ),
            },
        }
    }
}
