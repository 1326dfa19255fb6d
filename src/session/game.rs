//! The multi-round session state machine.
//!
//! `GameSession` is synchronous and owns all mutable game state: the roster,
//! the active round and the RNG. The actor in [`super::actor`] serializes
//! access to it and delivers what it returns.

use super::SessionError;
use crate::config::GameConfig;
use crate::games::fortune::{
    Dispatch, Event, GameRng, PhraseSource, Player, PlayerId, PlayerRoster, PrizeWheel,
    RoundEngine, RoundError, RoundRules, Standing,
};
use derive_more::{Display, From};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("session#{}", _0)]
pub struct SessionId(pub u64);

/// A game among a fixed set of players over a fixed number of rounds.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    roster: PlayerRoster,
    phrases: Arc<PhraseSource>,
    wheel: PrizeWheel,
    rules: RoundRules,
    round_cap: u32,
    completed_rounds: u32,
    round: Option<RoundEngine>,
    rng: GameRng,
    finished: bool,
    winner: Option<PlayerId>,
}

impl GameSession {
    /// Seats the players and prepares the session. Call [`GameSession::start`] to play.
    #[instrument(skip(players, phrases, config, rng), fields(players = players.len()))]
    pub fn new(
        id: SessionId,
        players: Vec<Player>,
        phrases: Arc<PhraseSource>,
        config: &GameConfig,
        rng: GameRng,
    ) -> Result<Self, SessionError> {
        let (min, max) = (*config.min_players(), *config.max_players());
        if players.len() < min {
            warn!(min, got = players.len(), "Not enough players");
            return Err(SessionError::NotEnoughPlayers {
                min,
                got: players.len(),
            });
        }
        if players.len() > max {
            warn!(max, got = players.len(), "Too many players");
            return Err(SessionError::TooManyPlayers {
                max,
                got: players.len(),
            });
        }

        let mut roster = PlayerRoster::new();
        for player in players {
            let id = player.id;
            if !roster.add(player) {
                return Err(SessionError::DuplicatePlayer { player: id });
            }
        }

        let wheel = config.wheel().map_err(|e| SessionError::InvalidConfig {
            message: e.message,
        })?;

        info!(session = %id, seed = rng.seed(), "Session created");
        Ok(Self {
            id,
            roster,
            phrases,
            wheel,
            rules: config.round_rules(),
            round_cap: *config.round_cap(),
            completed_rounds: 0,
            round: None,
            rng,
            finished: false,
            winner: None,
        })
    }

    /// Starts the first round.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn start(&mut self) -> Result<Vec<Dispatch>, SessionError> {
        if self.finished {
            return Err(SessionError::Closed { session: self.id });
        }
        if self.round.is_some() || self.completed_rounds > 0 {
            debug!("Session already started");
            return Ok(Vec::new());
        }
        self.start_round()
    }

    fn start_round(&mut self) -> Result<Vec<Dispatch>, SessionError> {
        let number = self.completed_rounds + 1;
        match RoundEngine::start(
            number,
            self.roster.snapshot(),
            &self.phrases,
            self.wheel.clone(),
            self.rules.clone(),
            &mut self.rng,
        ) {
            Ok((round, events)) => {
                self.round = Some(round);
                Ok(events.into_iter().map(Dispatch::all).collect())
            }
            Err(_) => {
                self.terminate();
                Err(SessionError::EmptyRoster)
            }
        }
    }

    /// Handles a guess. Rejections come back addressed to the submitter only.
    #[instrument(skip(self, text), fields(session = %self.id))]
    pub fn on_guess(&mut self, player: PlayerId, text: &str) -> Vec<Dispatch> {
        if self.finished {
            debug!(%player, "Guess after session end ignored");
            return Vec::new();
        }
        let Some(round) = self.round.as_mut() else {
            debug!(%player, "Guess before session start ignored");
            return Vec::new();
        };

        let events = match round.submit_guess(&mut self.roster, &mut self.rng, player, text) {
            Ok(events) => events,
            Err(RoundError::Rejected(reason)) => {
                return vec![Dispatch::only(player, Event::RejectedGuess { reason })];
            }
            Err(RoundError::EmptyRoster) => {
                self.terminate();
                return Vec::new();
            }
        };
        let complete = round.is_complete();

        let mut dispatches: Vec<Dispatch> = events.into_iter().map(Dispatch::all).collect();
        if complete {
            dispatches.extend(self.finish_round());
        }
        dispatches
    }

    /// Handles a departure, keeping the turn on a seated player.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn on_player_left(&mut self, player: PlayerId) -> Vec<Dispatch> {
        if self.finished || !self.roster.contains(player) {
            debug!(%player, "Departure of unseated player ignored");
            return Vec::new();
        }

        let remaining = self.roster.remove(player);
        info!(%player, remaining, "Player left");
        if remaining == 0 {
            self.terminate();
            return Vec::new();
        }

        let mut dispatches = vec![Dispatch::all(Event::PlayerLeft { player })];
        if let Some(round) = self.round.as_mut() {
            match round.remove_player(player, &mut self.rng) {
                Ok(events) => dispatches.extend(events.into_iter().map(Dispatch::all)),
                Err(_) => {
                    self.terminate();
                    return Vec::new();
                }
            }
        }
        dispatches
    }

    fn finish_round(&mut self) -> Vec<Dispatch> {
        self.completed_rounds += 1;
        self.round = None;
        info!(completed = self.completed_rounds, cap = self.round_cap, "Round finished");

        if self.completed_rounds >= self.round_cap {
            return self.conclude();
        }
        self.start_round().unwrap_or_default()
    }

    fn conclude(&mut self) -> Vec<Dispatch> {
        self.finished = true;
        let Some(winner) = self.roster.leader().map(|p| p.id) else {
            warn!("Session concluded with nobody seated");
            return Vec::new();
        };
        self.winner = Some(winner);

        let standings = self
            .roster
            .iter()
            .map(|p| Standing::new(p.id, p.name.clone(), p.score))
            .collect();
        info!(%winner, "Session finished");
        vec![Dispatch::all(Event::SessionEnded { winner, standings })]
    }

    fn terminate(&mut self) {
        warn!(session = %self.id, "Roster empty; ending session");
        self.finished = true;
        self.round = None;
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Players still seated.
    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    /// Ids of players still seated, in roster order.
    pub fn recipients(&self) -> Vec<PlayerId> {
        self.roster.snapshot()
    }

    /// The active round, if one is in progress.
    pub fn round(&self) -> Option<&RoundEngine> {
        self.round.as_ref()
    }

    /// Player holding the turn in the active round.
    pub fn current_player(&self) -> Option<PlayerId> {
        self.round.as_ref().and_then(RoundEngine::current_player)
    }

    /// Rounds played to completion.
    pub fn completed_rounds(&self) -> u32 {
        self.completed_rounds
    }

    /// Rounds per session.
    pub fn round_cap(&self) -> u32 {
        self.round_cap
    }

    /// Checks whether the session is over.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Winner, once the last round is complete.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }
}
