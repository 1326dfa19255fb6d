//! Phrase-guessing game logic: wheel, corpus, roster and the round state machine.

mod events;
mod invariants;
mod phrases;
mod rng;
mod roster;
mod round;
mod types;
mod wheel;

pub use events::{Audience, Dispatch, Event, GuessOutcome, Rejection, Standing};
pub use invariants::{
    IgnoredAlwaysRevealed, Invariant, InvariantSet, InvariantViolation, RevealWithinPhrase,
    RoundInvariants, TurnInBounds,
};
pub use phrases::{CorpusError, DEFAULT_CORPUS, Phrase, PhraseSource};
pub use rng::GameRng;
pub use roster::{PlayerRoster, TurnRemap, remap_turn};
pub use round::{
    DEFAULT_PHRASE_BONUS, DEFAULT_PLACEHOLDER, RoundEngine, RoundError, RoundPhase, RoundRules,
};
pub use types::{IgnoredChars, Player, PlayerId, fold};
pub use wheel::{DEFAULT_DENOMINATIONS, EmptyWheel, PrizeWheel};
