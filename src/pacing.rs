//! Dramatic pauses between broadcasts.
//!
//! Pauses are part of the game's feel: a beat of suspense before a guess is
//! resolved, and an intermission once a round's answer is out. The session
//! worker awaits them inline, so later commands queue behind the pause.

use crate::config::PacingConfig;
use crate::games::fortune::Event;
use async_trait::async_trait;
use tracing::trace;

/// Kind of pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Beat {
    /// Before a guess result is announced.
    Suspense,
    /// After a round ends, ahead of the next round or the final result.
    Intermission,
}

impl Beat {
    /// The pause, if any, that precedes `event`.
    pub fn before(event: &Event) -> Option<Self> {
        match event {
            Event::GuessResult { .. } => Some(Self::Suspense),
            _ => None,
        }
    }

    /// The pause, if any, that follows `event` once it is delivered.
    pub fn after(event: &Event) -> Option<Self> {
        match event {
            Event::RoundEnded { .. } => Some(Self::Intermission),
            _ => None,
        }
    }
}

/// Injectable pause hook.
#[async_trait]
pub trait Pacing: Send + Sync {
    /// Waits out a beat.
    async fn pause(&self, beat: Beat);
}

/// Never pauses. Used by tests and non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacing for NoPacing {
    async fn pause(&self, _beat: Beat) {}
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacing {
    config: PacingConfig,
}

impl TokioPacing {
    /// Creates pacing with the configured pause lengths.
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Pacing for TokioPacing {
    async fn pause(&self, beat: Beat) {
        let duration = match beat {
            Beat::Suspense => self.config.suspense(),
            Beat::Intermission => self.config.intermission(),
        };
        trace!(%beat, ?duration, "Pausing");
        tokio::time::sleep(duration).await;
    }
}
