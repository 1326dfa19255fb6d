//! Event delivery.
//!
//! The game core never talks to a transport directly; it hands events to a
//! [`Broadcaster`]. A failed delivery is logged and dropped: it never stops
//! delivery to the other recipients, and never rolls back game state.

use crate::games::fortune::{Audience, Dispatch, Event, PlayerId};
use async_trait::async_trait;
use derive_more::{Display, Error};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, instrument, warn};

/// A recipient could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Delivery to {} failed: {}", player, reason)]
pub struct DeliveryError {
    /// Intended recipient.
    pub player: PlayerId,
    /// What went wrong.
    pub reason: String,
}

impl DeliveryError {
    /// Creates a delivery error.
    pub fn new(player: PlayerId, reason: impl Into<String>) -> Self {
        Self {
            player,
            reason: reason.into(),
        }
    }
}

/// Delivers events to players.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Delivers an event to one player.
    async fn send_to(&self, player: PlayerId, event: &Event) -> Result<(), DeliveryError>;

    /// Delivers an event to every recipient concurrently.
    ///
    /// Failures are logged per recipient and otherwise ignored.
    async fn broadcast_all(&self, recipients: &[PlayerId], event: &Event) {
        let sends = recipients
            .iter()
            .map(|player| async move { self.send_to(*player, event).await });
        for result in join_all(sends).await {
            if let Err(e) = result {
                warn!(
                    player = %e.player,
                    reason = %e.reason,
                    kind = event.kind(),
                    "Delivery failed"
                );
            }
        }
    }
}

/// Routes one dispatch to its audience.
///
/// `seated` are the players currently in the session; they receive
/// [`Audience::All`] events.
#[instrument(skip_all, fields(kind = dispatch.event.kind()))]
pub async fn deliver(broadcaster: &dyn Broadcaster, seated: &[PlayerId], dispatch: &Dispatch) {
    match dispatch.audience {
        Audience::All => broadcaster.broadcast_all(seated, &dispatch.event).await,
        Audience::Only(player) => {
            if let Err(e) = broadcaster.send_to(player, &dispatch.event).await {
                warn!(player = %e.player, reason = %e.reason, "Delivery failed");
            }
        }
    }
}

/// One unbounded tokio channel per player.
///
/// A transport registers each connection and forwards whatever arrives on
/// the returned receiver.
#[derive(Debug, Clone, Default)]
pub struct ChannelBroadcaster {
    endpoints: Arc<RwLock<HashMap<PlayerId, mpsc::UnboundedSender<Event>>>>,
}

impl ChannelBroadcaster {
    /// Creates a broadcaster with no endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a player's endpoint.
    #[instrument(skip(self))]
    pub async fn register(&self, player: PlayerId) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.endpoints.write().await.insert(player, tx);
        debug!("Endpoint registered");
        rx
    }

    /// Drops a player's endpoint; later deliveries to them fail.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, player: PlayerId) {
        self.endpoints.write().await.remove(&player);
        debug!("Endpoint removed");
    }
}

#[async_trait]
impl Broadcaster for ChannelBroadcaster {
    async fn send_to(&self, player: PlayerId, event: &Event) -> Result<(), DeliveryError> {
        let endpoints = self.endpoints.read().await;
        let endpoint = endpoints
            .get(&player)
            .ok_or_else(|| DeliveryError::new(player, "no endpoint registered"))?;
        endpoint
            .send(event.clone())
            .map_err(|_| DeliveryError::new(player, "connection closed"))
    }
}
