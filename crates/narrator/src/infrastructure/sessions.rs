//! Process-wide player session store.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use taleweaver_domain::{PlayerId, PlayerSession};

/// Map of player id to their session, shared across all concurrent turns.
///
/// Each session sits behind its own `tokio::sync::Mutex`: a turn holds the
/// lock from action-append through arbitration, which serializes turns for
/// the same player while leaving different players fully independent.
/// Sessions are never removed during a run.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<PlayerId, Arc<Mutex<PlayerSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Store a session, replacing any existing one for the same player.
    pub fn insert(&self, session: PlayerSession) {
        self.sessions
            .insert(session.player_id(), Arc::new(Mutex::new(session)));
    }

    pub fn get(&self, player_id: PlayerId) -> Option<Arc<Mutex<PlayerSession>>> {
        self.sessions.get(&player_id).map(|entry| entry.clone())
    }
}
