//! Game configuration.
//!
//! Every field has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! round_cap = 3
//! phrase_bonus = 1000
//! prize_denominations = [50, 100, 150, 200, 250, 500, 1000]
//! ignored_characters = ",-'\" "
//!
//! [pacing]
//! suspense_ms = 1200
//! intermission_ms = 3000
//! ```

use crate::games::fortune::{
    CorpusError, DEFAULT_DENOMINATIONS, DEFAULT_PHRASE_BONUS, DEFAULT_PLACEHOLDER, GameRng,
    IgnoredChars, PhraseSource, PrizeWheel, RoundRules,
};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Characters revealed from the start of every round: comma, hyphen, apostrophe, quote, space.
pub const DEFAULT_IGNORED_CHARACTERS: &str = ",-'\" ";

/// Session and round rules.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Values the prize wheel can land on.
    #[serde(default = "default_denominations")]
    prize_denominations: Vec<u64>,

    /// Rounds per session.
    #[serde(default = "default_round_cap")]
    round_cap: u32,

    /// Award for solving the whole phrase.
    #[serde(default = "default_phrase_bonus")]
    phrase_bonus: u64,

    /// Characters that are always revealed and never scored.
    #[serde(default = "default_ignored_characters")]
    ignored_characters: String,

    /// Shown in place of unrevealed characters.
    #[serde(default = "default_placeholder")]
    placeholder: char,

    /// Fewest players a session may start with.
    #[serde(default = "default_min_players")]
    min_players: usize,

    /// Most players a session may start with.
    #[serde(default = "default_max_players")]
    max_players: usize,

    /// Phrase corpus file; the built-in corpus is used when absent.
    #[serde(default)]
    phrases_path: Option<PathBuf>,

    /// Fixed seed for reproducible sessions.
    #[serde(default)]
    seed: Option<u64>,

    /// Dramatic pauses between broadcasts.
    #[serde(default)]
    pacing: PacingConfig,
}

/// Pause lengths, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause before a guess result is announced.
    #[serde(default = "default_suspense_ms")]
    suspense_ms: u64,

    /// Pause before a new round or the final result.
    #[serde(default = "default_intermission_ms")]
    intermission_ms: u64,
}

fn default_denominations() -> Vec<u64> {
    DEFAULT_DENOMINATIONS.to_vec()
}

fn default_round_cap() -> u32 {
    3
}

fn default_phrase_bonus() -> u64 {
    DEFAULT_PHRASE_BONUS
}

fn default_ignored_characters() -> String {
    DEFAULT_IGNORED_CHARACTERS.to_string()
}

fn default_placeholder() -> char {
    DEFAULT_PLACEHOLDER
}

fn default_min_players() -> usize {
    2
}

fn default_max_players() -> usize {
    8
}

fn default_suspense_ms() -> u64 {
    1200
}

fn default_intermission_ms() -> u64 {
    3000
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            suspense_ms: default_suspense_ms(),
            intermission_ms: default_intermission_ms(),
        }
    }
}

impl PacingConfig {
    /// Creates pacing with explicit pause lengths.
    pub fn new(suspense_ms: u64, intermission_ms: u64) -> Self {
        Self {
            suspense_ms,
            intermission_ms,
        }
    }

    /// Pause before a guess result.
    pub fn suspense(&self) -> Duration {
        Duration::from_millis(self.suspense_ms)
    }

    /// Pause before a new round or the final result.
    pub fn intermission(&self) -> Duration {
        Duration::from_millis(self.intermission_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            prize_denominations: default_denominations(),
            round_cap: default_round_cap(),
            phrase_bonus: default_phrase_bonus(),
            ignored_characters: default_ignored_characters(),
            placeholder: default_placeholder(),
            min_players: default_min_players(),
            max_players: default_max_players(),
            phrases_path: None,
            seed: None,
            pacing: PacingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Loads and validates configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(round_cap = config.round_cap, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values are playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prize_denominations.is_empty() {
            return Err(ConfigError::new("prize_denominations must not be empty"));
        }
        if self.round_cap == 0 {
            return Err(ConfigError::new("round_cap must be at least 1"));
        }
        if self.min_players == 0 {
            return Err(ConfigError::new("min_players must be at least 1"));
        }
        if self.min_players > self.max_players {
            return Err(ConfigError::new(format!(
                "min_players ({}) exceeds max_players ({})",
                self.min_players, self.max_players
            )));
        }
        if self.ignored_characters.contains(self.placeholder) {
            return Err(ConfigError::new("placeholder must not be an ignored character"));
        }
        Ok(())
    }

    /// Overrides the corpus path.
    pub fn with_phrases_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.phrases_path = Some(path.into());
        self
    }

    /// Overrides the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overrides the round cap.
    pub fn with_round_cap(mut self, round_cap: u32) -> Self {
        self.round_cap = round_cap;
        self
    }

    /// Overrides the player limits.
    pub fn with_player_limits(mut self, min_players: usize, max_players: usize) -> Self {
        self.min_players = min_players;
        self.max_players = max_players;
        self
    }

    /// Overrides the pause lengths.
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// The ignored-character set.
    pub fn ignored(&self) -> IgnoredChars {
        IgnoredChars::new(&self.ignored_characters)
    }

    /// Rules for each round.
    pub fn round_rules(&self) -> RoundRules {
        RoundRules {
            ignored: self.ignored(),
            phrase_bonus: self.phrase_bonus,
            placeholder: self.placeholder,
        }
    }

    /// The prize wheel.
    pub fn wheel(&self) -> Result<PrizeWheel, ConfigError> {
        PrizeWheel::new(self.prize_denominations.clone())
            .map_err(|e| ConfigError::new(e.to_string()))
    }

    /// RNG from the configured seed, or from entropy.
    pub fn rng(&self) -> GameRng {
        self.seed.map(GameRng::new).unwrap_or_else(GameRng::from_entropy)
    }

    /// Loads the configured corpus, or the built-in one.
    #[instrument(skip(self))]
    pub fn load_phrases(&self) -> Result<PhraseSource, CorpusError> {
        let ignored = self.ignored();
        match &self.phrases_path {
            Some(path) => PhraseSource::from_file(path, &ignored),
            None => PhraseSource::builtin(&ignored),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
