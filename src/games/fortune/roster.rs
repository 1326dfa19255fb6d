//! Ordered player roster and the turn reindex rule.

use super::types::{Player, PlayerId};
use tracing::{debug, instrument};

/// Where the turn lands after a player is removed from a turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRemap {
    /// A later player left; the index is untouched.
    Unchanged(usize),
    /// An earlier player left; the same player keeps the turn at a compacted index.
    Shifted(usize),
    /// The turn holder left; the turn passes to their successor.
    Passed(usize),
    /// Nobody is left to hold the turn.
    Vacant,
}

/// Recomputes the current-turn index after the player at `removed` left.
///
/// `remaining` is the number of players after removal. When the turn holder
/// leaves, the index is stepped back one place and then advanced, so the
/// turn passes to whoever followed them (wrapping to the front).
pub fn remap_turn(current: usize, removed: usize, remaining: usize) -> TurnRemap {
    if remaining == 0 {
        return TurnRemap::Vacant;
    }
    match removed.cmp(&current) {
        std::cmp::Ordering::Greater => TurnRemap::Unchanged(current),
        std::cmp::Ordering::Less => TurnRemap::Shifted(current - 1),
        std::cmp::Ordering::Equal => {
            let stepped_back = (current + remaining - 1) % remaining;
            TurnRemap::Passed((stepped_back + 1) % remaining)
        }
    }
}

/// Ordered collection of the players in a session.
#[derive(Debug, Clone, Default)]
pub struct PlayerRoster {
    players: Vec<Player>,
}

impl PlayerRoster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a player. Returns `false` and leaves the roster untouched on a duplicate id.
    #[instrument(skip(self, player), fields(player = %player.id, name = %player.name))]
    pub fn add(&mut self, player: Player) -> bool {
        if self.contains(player.id) {
            debug!("Player already seated");
            return false;
        }
        self.players.push(player);
        true
    }

    /// Removes a player by id and returns the roster size afterwards.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: PlayerId) -> usize {
        if let Some(idx) = self.position(id) {
            self.players.remove(idx);
            debug!(remaining = self.players.len(), "Player removed from roster");
        }
        self.players.len()
    }

    /// Current ordering of player ids, for a new round to bind against.
    pub fn snapshot(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Index of a player in roster order.
    pub fn position(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Checks whether a player is seated.
    pub fn contains(&self, id: PlayerId) -> bool {
        self.position(id).is_some()
    }

    /// Looks up a player.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Looks up a player mutably.
    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Adds `amount` to a player's score and returns the new score.
    pub fn award(&mut self, id: PlayerId, amount: u64) -> Option<u64> {
        self.get_mut(id).map(|p| {
            p.score = p.score.saturating_add(amount);
            p.score
        })
    }

    /// Player with the highest score; the first in roster order wins ties.
    pub fn leader(&self) -> Option<&Player> {
        self.players.iter().fold(None, |best: Option<&Player>, p| match best {
            Some(b) if b.score >= p.score => Some(b),
            _ => Some(p),
        })
    }

    /// Players in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Number of seated players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Checks whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
