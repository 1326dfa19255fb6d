//! Core domain types for the phrase-guessing game.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Opaque player handle, stable for the lifetime of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[display("player#{}", _0)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// A player seated in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player's unique handle.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Accumulated prize money.
    pub score: u64,
}

impl Player {
    /// Creates a player with a zero score.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score: 0,
        }
    }
}

/// Case-folds a single character.
///
/// Characters whose lowercase form expands to several code points keep
/// their first one, so the folded phrase stays aligned with the original.
pub fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Characters that are always revealed and never scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredChars(BTreeSet<char>);

impl IgnoredChars {
    /// Builds the set from every character of `chars`, case-folded.
    pub fn new(chars: &str) -> Self {
        Self(chars.chars().map(fold).collect())
    }

    /// Checks whether `c` is ignored.
    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&fold(c))
    }

    /// Iterates over the ignored characters.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }
}

impl Default for IgnoredChars {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_IGNORED_CHARACTERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_lowercases_ascii_and_keeps_punctuation() {
        assert_eq!(fold('C'), 'c');
        assert_eq!(fold('-'), '-');
        assert_eq!(fold('Ä'), 'ä');
    }

    #[test]
    fn default_ignored_set_covers_punctuation_and_space() {
        let ignored = IgnoredChars::default();
        for c in [',', '-', '\'', '"', ' '] {
            assert!(ignored.contains(c), "{c:?} should be ignored");
        }
        assert!(!ignored.contains('a'));
    }

    #[test]
    fn player_id_displays_with_prefix() {
        assert_eq!(PlayerId(3).to_string(), "player#3");
    }
}
