//! Strictly Fortune library - a turn-based phrase-guessing game
//!
//! Players take turns spinning a prize wheel and guessing letters of a
//! hidden phrase, or the whole phrase at once. The highest score after the
//! last round wins.
//!
//! # Architecture
//!
//! - **Games**: wheel, phrase corpus, roster and the synchronous round engine
//! - **Session**: multi-round state machine driven by one tokio worker per session
//! - **Broadcast**: delivery of events to players through an async trait
//! - **Pacing**: injectable pauses between broadcasts
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_fortune::{
//!     ChannelBroadcaster, GameConfig, NoPacing, Player, PlayerId, SessionRegistry,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default().with_seed(7);
//! let phrases = config.load_phrases()?;
//! let registry = SessionRegistry::new(config, phrases, Arc::new(NoPacing));
//!
//! let broadcaster = ChannelBroadcaster::new();
//! let mut inbox = broadcaster.register(PlayerId(1)).await;
//! let _other = broadcaster.register(PlayerId(2)).await;
//!
//! let players = vec![Player::new(1u64, "Ada"), Player::new(2u64, "Grace")];
//! let session = registry.start_session(players, Arc::new(broadcaster)).await?;
//! registry.submit_guess(session, PlayerId(1), "e").await?;
//! while let Some(event) = inbox.recv().await {
//!     println!("{}", serde_json::to_string(&event)?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod broadcast;
mod config;
mod console;
mod games;
mod pacing;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, DEFAULT_IGNORED_CHARACTERS, GameConfig, PacingConfig};

// Crate-level exports - Delivery
pub use broadcast::{Broadcaster, ChannelBroadcaster, DeliveryError, deliver};
pub use console::ConsoleBroadcaster;

// Crate-level exports - Pacing
pub use pacing::{Beat, NoPacing, Pacing, TokioPacing};

// Crate-level exports - Session management
pub use session::{GameSession, SessionError, SessionHandle, SessionId, SessionRegistry};

// Crate-level exports - Game types
pub use games::fortune::{
    Audience, CorpusError, DEFAULT_CORPUS, DEFAULT_DENOMINATIONS, DEFAULT_PHRASE_BONUS,
    DEFAULT_PLACEHOLDER, Dispatch, EmptyWheel, Event, GameRng, GuessOutcome, IgnoredAlwaysRevealed,
    IgnoredChars, Invariant, InvariantSet, InvariantViolation, Phrase, PhraseSource, Player,
    PlayerId, PlayerRoster, PrizeWheel, Rejection, RevealWithinPhrase, RoundEngine, RoundError,
    RoundInvariants, RoundPhase, RoundRules, Standing, TurnInBounds, TurnRemap, fold, remap_turn,
};
