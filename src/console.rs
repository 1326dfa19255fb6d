//! Terminal rendering for hot-seat play.
//!
//! All players share one screen, so a broadcast is printed once rather than
//! once per recipient.

use crate::broadcast::{Broadcaster, DeliveryError};
use crate::games::fortune::{Event, GuessOutcome, Player, PlayerId};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Prints events to stdout using player names.
#[derive(Debug, Clone, Default)]
pub struct ConsoleBroadcaster {
    names: HashMap<PlayerId, String>,
}

impl ConsoleBroadcaster {
    /// Creates a broadcaster that knows the given players' names.
    pub fn new<'a>(players: impl IntoIterator<Item = &'a Player>) -> Self {
        Self {
            names: players
                .into_iter()
                .map(|p| (p.id, p.name.clone()))
                .collect(),
        }
    }

    fn name(&self, player: PlayerId) -> String {
        self.names
            .get(&player)
            .cloned()
            .unwrap_or_else(|| player.to_string())
    }

    /// Renders an event as one line of text.
    pub fn describe(&self, event: &Event) -> String {
        match event {
            Event::RoundStarted {
                round,
                masked_phrase,
                category,
            } => match category {
                Some(category) => format!("Round {round} ({category}): {masked_phrase}"),
                None => format!("Round {round}: {masked_phrase}"),
            },
            Event::TurnChanged { owner } => format!("It is {}'s turn", self.name(*owner)),
            Event::PrizeUpdated { amount } => format!("The wheel lands on ${amount}"),
            Event::GuessResult {
                player,
                guess,
                outcome,
                amount_won,
            } => match (outcome, amount_won) {
                (GuessOutcome::Correct, Some(amount)) => {
                    format!("{} guessed '{guess}' and won ${amount}", self.name(*player))
                }
                (GuessOutcome::Correct, None) => {
                    format!("{} guessed '{guess}' correctly", self.name(*player))
                }
                (GuessOutcome::Incorrect, _) => {
                    format!("{} guessed '{guess}': no luck", self.name(*player))
                }
            },
            Event::ScoreUpdated { player, score } => {
                format!("{} now has ${score}", self.name(*player))
            }
            Event::PhraseRevealed { masked_phrase } => format!("  {masked_phrase}"),
            Event::RoundEnded { round, phrase } => {
                format!("Round {round} is over. The phrase was \"{phrase}\"")
            }
            Event::PlayerLeft { player } => format!("{} left the game", self.name(*player)),
            Event::SessionEnded { winner, standings } => {
                let table: Vec<String> = standings
                    .iter()
                    .map(|s| format!("{}: ${}", s.name, s.score))
                    .collect();
                format!("{} wins! Final scores: {}", self.name(*winner), table.join(", "))
            }
            Event::RejectedGuess { reason } => reason.to_string(),
        }
    }
}

#[async_trait]
impl Broadcaster for ConsoleBroadcaster {
    async fn send_to(&self, player: PlayerId, event: &Event) -> Result<(), DeliveryError> {
        println!("[{}] {}", self.name(player), self.describe(event));
        Ok(())
    }

    async fn broadcast_all(&self, recipients: &[PlayerId], event: &Event) {
        debug!(recipients = recipients.len(), kind = event.kind(), "Printing broadcast");
        println!("{}", self.describe(event));
    }
}
