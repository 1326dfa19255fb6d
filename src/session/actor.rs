//! Per-session worker.
//!
//! Each session runs on one tokio task that reads commands from an unbounded
//! queue. A command is resolved completely, including its pacing pauses and
//! deliveries, before the next one is read, so guesses and departures never
//! interleave.

use super::{GameSession, SessionError, SessionId};
use crate::broadcast::{Broadcaster, deliver};
use crate::games::fortune::{Dispatch, PlayerId};
use crate::pacing::{Beat, Pacing};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{Instrument, debug, info, info_span};

#[derive(Debug)]
enum Command {
    Guess { player: PlayerId, text: String },
    Leave { player: PlayerId },
}

/// Handle to a running session. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::UnboundedSender<Command>,
    finished: watch::Receiver<bool>,
}

impl SessionHandle {
    /// Starts the session and spawns its worker on the current tokio runtime.
    ///
    /// The opening round's events are delivered by the worker before any
    /// queued command is processed.
    pub fn spawn(
        mut session: GameSession,
        broadcaster: Arc<dyn Broadcaster>,
        pacing: Arc<dyn Pacing>,
    ) -> Result<Self, SessionError> {
        let id = session.id();
        let opening = session.start()?;
        let (commands, queue) = mpsc::unbounded_channel();
        let (done, finished) = watch::channel(false);

        let span = info_span!("session", session = %id);
        tokio::spawn(run(session, opening, queue, broadcaster, pacing, done).instrument(span));

        Ok(Self {
            id,
            commands,
            finished,
        })
    }

    /// Session identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queues a guess.
    pub fn submit_guess(
        &self,
        player: PlayerId,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.send(Command::Guess {
            player,
            text: text.into(),
        })
    }

    /// Queues a departure.
    pub fn player_left(&self, player: PlayerId) -> Result<(), SessionError> {
        self.send(Command::Leave { player })
    }

    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Closed { session: self.id })
    }

    /// Checks whether the worker has stopped.
    pub fn is_finished(&self) -> bool {
        *self.finished.borrow()
    }

    /// Waits until the session ends.
    pub async fn wait_finished(&self) {
        let mut finished = self.finished.clone();
        // A dropped sender means the worker is gone, which is also an end.
        let _ = finished.wait_for(|done| *done).await;
    }
}

async fn run(
    mut session: GameSession,
    opening: Vec<Dispatch>,
    mut queue: mpsc::UnboundedReceiver<Command>,
    broadcaster: Arc<dyn Broadcaster>,
    pacing: Arc<dyn Pacing>,
    done: watch::Sender<bool>,
) {
    info!("Session worker started");
    dispatch_all(&session, opening, broadcaster.as_ref(), pacing.as_ref()).await;

    while !session.is_finished() {
        let Some(command) = queue.recv().await else {
            debug!("All handles dropped");
            break;
        };
        debug!(?command, "Processing command");
        let dispatches = match command {
            Command::Guess { player, text } => session.on_guess(player, &text),
            Command::Leave { player } => session.on_player_left(player),
        };
        dispatch_all(&session, dispatches, broadcaster.as_ref(), pacing.as_ref()).await;
    }

    queue.close();
    done.send_replace(true);
    info!(
        winner = ?session.winner(),
        rounds = session.completed_rounds(),
        "Session worker stopped"
    );
}

async fn dispatch_all(
    session: &GameSession,
    dispatches: Vec<Dispatch>,
    broadcaster: &dyn Broadcaster,
    pacing: &dyn Pacing,
) {
    let seated = session.recipients();
    for dispatch in &dispatches {
        if let Some(beat) = Beat::before(&dispatch.event) {
            pacing.pause(beat).await;
        }
        deliver(broadcaster, &seated, dispatch).await;
        if let Some(beat) = Beat::after(&dispatch.event) {
            pacing.pause(beat).await;
        }
    }
}
