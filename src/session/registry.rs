//! Registry of live sessions.

use super::{GameSession, SessionError, SessionHandle, SessionId};
use crate::broadcast::Broadcaster;
use crate::config::GameConfig;
use crate::games::fortune::{GameRng, PhraseSource, Player, PlayerId};
use crate::pacing::Pacing;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
struct RegistryState {
    sessions: HashMap<SessionId, SessionHandle>,
    next_id: u64,
    rng: GameRng,
}

/// Owns every live session. Clone to share between request handlers.
#[derive(Clone)]
pub struct SessionRegistry {
    config: Arc<GameConfig>,
    phrases: Arc<PhraseSource>,
    pacing: Arc<dyn Pacing>,
    state: Arc<Mutex<RegistryState>>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("config", &self.config)
            .field("phrases", &self.phrases.len())
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Creates an empty registry.
    ///
    /// Each session gets its own RNG forked from one seeded by `config`.
    #[instrument(skip_all)]
    pub fn new(config: GameConfig, phrases: PhraseSource, pacing: Arc<dyn Pacing>) -> Self {
        let rng = config.rng();
        info!(seed = rng.seed(), phrases = phrases.len(), "Creating session registry");
        Self {
            config: Arc::new(config),
            phrases: Arc::new(phrases),
            pacing,
            state: Arc::new(Mutex::new(RegistryState {
                sessions: HashMap::new(),
                next_id: 1,
                rng,
            })),
        }
    }

    /// Starts a session for the given players and returns its id.
    #[instrument(skip(self, players, broadcaster), fields(players = players.len()))]
    pub async fn start_session(
        &self,
        players: Vec<Player>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Result<SessionId, SessionError> {
        let mut state = self.state.lock().await;
        let id = SessionId(state.next_id);
        let rng = state.rng.fork();

        let session = GameSession::new(id, players, Arc::clone(&self.phrases), &self.config, rng)?;
        let handle = SessionHandle::spawn(session, broadcaster, Arc::clone(&self.pacing))?;

        state.next_id += 1;
        state.sessions.insert(id, handle);
        info!(session = %id, "Session started");
        Ok(id)
    }

    /// Handle to a session.
    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        let session = self.state.lock().await.sessions.get(&id).cloned();
        if session.is_none() {
            debug!(session = %id, "Session not found");
        }
        session
    }

    async fn handle(&self, id: SessionId) -> Result<SessionHandle, SessionError> {
        self.get(id)
            .await
            .ok_or(SessionError::UnknownSession { session: id })
    }

    /// Forwards a guess to a session.
    #[instrument(skip(self, text))]
    pub async fn submit_guess(
        &self,
        id: SessionId,
        player: PlayerId,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.handle(id).await?.submit_guess(player, text)
    }

    /// Forwards a departure to a session.
    #[instrument(skip(self))]
    pub async fn player_left(&self, id: SessionId, player: PlayerId) -> Result<(), SessionError> {
        self.handle(id).await?.player_left(player)
    }

    /// Ids of all tracked sessions, in ascending order.
    pub async fn list_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.state.lock().await.sessions.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Stops tracking finished sessions and returns how many were dropped.
    #[instrument(skip(self))]
    pub async fn reap_finished(&self) -> usize {
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|id, handle| {
            let keep = !handle.is_finished();
            if !keep {
                debug!(session = %id, "Reaping finished session");
            }
            keep
        });
        let reaped = before - state.sessions.len();
        if reaped > 0 {
            info!(reaped, "Finished sessions removed");
        }
        reaped
    }

    /// The configuration sessions are created with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl Drop for RegistryState {
    fn drop(&mut self) {
        let live = self.sessions.values().filter(|h| !h.is_finished()).count();
        if live > 0 {
            warn!(live, "Registry dropped with live sessions");
        }
    }
}
