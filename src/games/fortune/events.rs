//! Outbound game events.
//!
//! Events are domain facts produced by the round engine and the session.
//! They serialize as `{"type": "...", "data": {...}}` so a transport can
//! forward them unchanged.

use super::types::PlayerId;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Why a guess was refused. Only the submitter is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error)]
#[derive(Serialize, Deserialize, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The guess came from a player who does not hold the turn.
    #[display("It is not your turn")]
    InvalidTurn,
    /// Empty guess, or a single character that is not a letter.
    #[display("Guess must be a letter or the whole phrase")]
    InvalidGuessFormat,
    /// The letter was already guessed this round.
    #[display("That letter has already been guessed")]
    DuplicateGuess,
}

/// Whether an accepted guess was right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessOutcome {
    /// Letter present, or phrase matched.
    Correct,
    /// Letter absent, or phrase mismatched.
    Incorrect,
}

/// Final standing of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Standing {
    /// The player.
    pub player: PlayerId,
    /// Display name.
    pub name: String,
    /// Final score.
    pub score: u64,
}

/// Event delivered to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    /// A new round began.
    RoundStarted {
        /// 1-based round number.
        round: u32,
        /// Phrase with unrevealed letters masked.
        masked_phrase: String,
        /// Category of the phrase, if the corpus gave one.
        category: Option<String>,
    },
    /// The turn moved to a new owner.
    TurnChanged {
        /// Player now allowed to guess.
        owner: PlayerId,
    },
    /// The wheel produced a new prize.
    PrizeUpdated {
        /// Prize per revealed letter.
        amount: u64,
    },
    /// A guess was resolved.
    GuessResult {
        /// Who guessed.
        player: PlayerId,
        /// The normalized guess.
        guess: String,
        /// Whether it was right.
        outcome: GuessOutcome,
        /// Money won by this guess, if any.
        amount_won: Option<u64>,
    },
    /// A player's score changed.
    ScoreUpdated {
        /// The player.
        player: PlayerId,
        /// Their new total.
        score: u64,
    },
    /// The masked view changed.
    PhraseRevealed {
        /// Phrase with unrevealed letters masked.
        masked_phrase: String,
    },
    /// The round is complete.
    RoundEnded {
        /// 1-based round number.
        round: u32,
        /// The full phrase.
        phrase: String,
    },
    /// A player left the session.
    PlayerLeft {
        /// Who left.
        player: PlayerId,
    },
    /// The session finished after the last round.
    SessionEnded {
        /// Highest scorer.
        winner: PlayerId,
        /// Everyone's final score, in roster order.
        standings: Vec<Standing>,
    },
    /// A guess was refused.
    RejectedGuess {
        /// Why.
        reason: Rejection,
    },
}

impl Event {
    /// Wire name of the event, e.g. `"ROUND_STARTED"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Who receives an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every seated player.
    All,
    /// A single player.
    Only(PlayerId),
}

/// An event paired with its audience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Recipients.
    pub audience: Audience,
    /// Payload.
    pub event: Event,
}

impl Dispatch {
    /// An event for every seated player.
    pub fn all(event: Event) -> Self {
        Self {
            audience: Audience::All,
            event,
        }
    }

    /// An event for one player.
    pub fn only(player: PlayerId, event: Event) -> Self {
        Self {
            audience: Audience::Only(player),
            event,
        }
    }
}
