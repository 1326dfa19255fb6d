//! Game session management.
//!
//! - [`GameSession`]: the synchronous round/session state machine.
//! - [`SessionHandle`]: a single tokio worker that feeds it commands one at a time.
//! - [`SessionRegistry`]: owns the handles of every live session.

mod actor;
mod game;
mod registry;

pub use actor::SessionHandle;
pub use game::{GameSession, SessionId};
pub use registry::SessionRegistry;

use crate::games::fortune::PlayerId;
use derive_more::{Display, Error};

/// Session-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// Fewer players than the configured minimum.
    #[display("Session needs at least {} players, got {}", min, got)]
    NotEnoughPlayers {
        /// Configured minimum.
        min: usize,
        /// Players offered.
        got: usize,
    },

    /// More players than the configured maximum.
    #[display("Session allows at most {} players, got {}", max, got)]
    TooManyPlayers {
        /// Configured maximum.
        max: usize,
        /// Players offered.
        got: usize,
    },

    /// The same player was seated twice.
    #[display("{} is already seated", player)]
    DuplicatePlayer {
        /// The repeated player.
        player: PlayerId,
    },

    /// The configuration cannot produce a playable session.
    #[display("Invalid session config: {}", message)]
    InvalidConfig {
        /// What is wrong.
        message: String,
    },

    /// Every player left; the session ended without a winner.
    #[display("All players left the session")]
    EmptyRoster,

    /// The session has finished and accepts no more events.
    #[display("{} has already finished", session)]
    Closed {
        /// The finished session.
        session: SessionId,
    },

    /// No such session in the registry.
    #[display("No session with id {}", session)]
    UnknownSession {
        /// The requested id.
        session: SessionId,
    },
}
