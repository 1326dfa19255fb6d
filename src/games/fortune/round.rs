//! The turn state machine for a single round.
//!
//! A round binds to a snapshot of the roster's ordering when it starts.
//! Roster changes reach it only through [`RoundEngine::remove_player`],
//! which the session calls after updating its own roster.
//!
//! Every accepted guess yields the ordered list of events the players
//! should see; refused guesses change nothing and yield a [`Rejection`].

use super::events::{Event, GuessOutcome, Rejection};
use super::invariants::{InvariantSet, RoundInvariants};
use super::phrases::{Phrase, PhraseSource};
use super::rng::GameRng;
use super::roster::{PlayerRoster, TurnRemap, remap_turn};
use super::types::{IgnoredChars, PlayerId, fold};
use super::wheel::PrizeWheel;
use derive_more::{Display, Error};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Default bonus for guessing the whole phrase.
pub const DEFAULT_PHRASE_BONUS: u64 = 1000;

/// Default placeholder for unrevealed characters.
pub const DEFAULT_PLACEHOLDER: char = '_';

/// Round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RoundPhase {
    /// Waiting for the turn holder to guess.
    #[display("awaiting guess")]
    AwaitingGuess,
    /// Phrase solved; no further guesses are accepted.
    #[display("complete")]
    Complete,
}

/// Rules a round is played under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRules {
    /// Characters revealed from the start and never scored.
    pub ignored: IgnoredChars,
    /// Award for solving the whole phrase.
    pub phrase_bonus: u64,
    /// Shown in place of unrevealed characters.
    pub placeholder: char,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            ignored: IgnoredChars::default(),
            phrase_bonus: DEFAULT_PHRASE_BONUS,
            placeholder: DEFAULT_PLACEHOLDER,
        }
    }
}

/// Why a round operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum RoundError {
    /// The guess was refused; the submitter should be told.
    #[display("{}", _0)]
    Rejected(#[error(not(source))] Rejection),
    /// No players remain to hold the turn.
    #[display("No players left to hold the turn")]
    EmptyRoster,
}

impl From<Rejection> for RoundError {
    fn from(rejection: Rejection) -> Self {
        Self::Rejected(rejection)
    }
}

/// State of one round.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    number: u32,
    phrase: Phrase,
    order: Vec<PlayerId>,
    turn: usize,
    guessed: BTreeSet<char>,
    total_guessed: usize,
    prize: u64,
    phase: RoundPhase,
    wheel: PrizeWheel,
    rules: RoundRules,
}

impl RoundEngine {
    /// Starts a round: draws a phrase and a random first player.
    ///
    /// Returns the engine and the opening events (`RoundStarted`,
    /// `TurnChanged`, `PrizeUpdated`).
    #[instrument(skip(order, phrases, wheel, rules, rng), fields(players = order.len()))]
    pub fn start(
        number: u32,
        order: Vec<PlayerId>,
        phrases: &PhraseSource,
        wheel: PrizeWheel,
        rules: RoundRules,
        rng: &mut GameRng,
    ) -> Result<(Self, Vec<Event>), RoundError> {
        if order.is_empty() {
            return Err(RoundError::EmptyRoster);
        }
        let phrase = phrases.draw(rng);
        let first = rng.index(order.len());
        Self::begin(number, order, phrase, first, wheel, rules, rng)
    }

    /// Starts a round with a known phrase and first player.
    ///
    /// `first` is taken modulo the number of players.
    #[instrument(
        skip(order, phrase, wheel, rules, rng),
        fields(players = order.len(), phrase_len = phrase.scoreable_len())
    )]
    pub fn begin(
        number: u32,
        order: Vec<PlayerId>,
        phrase: Phrase,
        first: usize,
        wheel: PrizeWheel,
        rules: RoundRules,
        rng: &mut GameRng,
    ) -> Result<(Self, Vec<Event>), RoundError> {
        if order.is_empty() {
            return Err(RoundError::EmptyRoster);
        }
        let turn = first % order.len();
        let guessed = rules.ignored.iter().collect();
        let prize = wheel.spin(rng);

        let round = Self {
            number,
            phrase,
            order,
            turn,
            guessed,
            total_guessed: 0,
            prize,
            phase: RoundPhase::AwaitingGuess,
            wheel,
            rules,
        };

        let events = vec![
            Event::RoundStarted {
                round: number,
                masked_phrase: round.masked_phrase(),
                category: round.phrase.category().map(str::to_string),
            },
            Event::TurnChanged {
                owner: round.order[turn],
            },
            Event::PrizeUpdated { amount: prize },
        ];

        info!(round = number, owner = %round.order[turn], prize, "Round started");
        Ok((round, events))
    }

    /// Resolves a guess from `player`.
    ///
    /// Scores are credited to `roster`. On success, returns the events to
    /// broadcast, in order. A refused guess leaves every piece of state
    /// untouched.
    #[instrument(skip(self, roster, rng), fields(round = self.number))]
    pub fn submit_guess(
        &mut self,
        roster: &mut PlayerRoster,
        rng: &mut GameRng,
        player: PlayerId,
        raw: &str,
    ) -> Result<Vec<Event>, RoundError> {
        if self.phase == RoundPhase::Complete || self.current_player() != Some(player) {
            warn!(%player, owner = ?self.current_player(), "Guess out of turn");
            return Err(Rejection::InvalidTurn.into());
        }

        let guess: String = raw.trim().chars().map(fold).collect();
        let mut chars = guess.chars();
        let result = match (chars.next(), chars.next()) {
            (None, _) => Err(Rejection::InvalidGuessFormat.into()),
            (Some(letter), None) => self.guess_letter(roster, rng, player, letter),
            (Some(_), Some(_)) => self.guess_phrase(roster, rng, player, guess),
        };

        if let Err(RoundError::Rejected(reason)) = &result {
            debug!(%player, %reason, "Guess rejected");
        }
        debug_assert!(
            RoundInvariants::check_all(self).is_ok(),
            "round invariants violated: {:?}",
            RoundInvariants::check_all(self)
        );
        result
    }

    fn guess_letter(
        &mut self,
        roster: &mut PlayerRoster,
        rng: &mut GameRng,
        player: PlayerId,
        letter: char,
    ) -> Result<Vec<Event>, RoundError> {
        if !letter.is_alphabetic() {
            return Err(Rejection::InvalidGuessFormat.into());
        }
        if !self.guessed.insert(letter) {
            return Err(Rejection::DuplicateGuess.into());
        }

        let hits = self.phrase.occurrences(letter);
        let mut events = Vec::new();

        if hits == 0 {
            debug!(%player, %letter, "Letter not in phrase");
            events.push(Event::GuessResult {
                player,
                guess: letter.to_string(),
                outcome: GuessOutcome::Incorrect,
                amount_won: None,
            });
            events.push(self.revealed());
            self.pass_turn(rng, &mut events)?;
            return Ok(events);
        }

        let won = self.prize.saturating_mul(hits as u64);
        let score = roster.award(player, won).unwrap_or_default();
        self.total_guessed += hits;
        debug!(%player, %letter, hits, won, total = self.total_guessed, "Letter revealed");

        events.push(Event::GuessResult {
            player,
            guess: letter.to_string(),
            outcome: GuessOutcome::Correct,
            amount_won: Some(won),
        });
        events.push(Event::ScoreUpdated { player, score });
        events.push(self.revealed());

        if self.total_guessed >= self.phrase.scoreable_len() {
            self.complete(&mut events);
        } else {
            // Correct letters keep the turn; only the prize changes.
            self.prize = self.wheel.spin(rng);
            events.push(Event::PrizeUpdated { amount: self.prize });
        }
        Ok(events)
    }

    fn guess_phrase(
        &mut self,
        roster: &mut PlayerRoster,
        rng: &mut GameRng,
        player: PlayerId,
        guess: String,
    ) -> Result<Vec<Event>, RoundError> {
        let mut events = Vec::new();

        if !self.matches_phrase(&guess) {
            debug!(%player, %guess, "Phrase guess missed");
            events.push(Event::GuessResult {
                player,
                guess,
                outcome: GuessOutcome::Incorrect,
                amount_won: None,
            });
            events.push(self.revealed());
            self.pass_turn(rng, &mut events)?;
            return Ok(events);
        }

        let bonus = self.rules.phrase_bonus;
        let score = roster.award(player, bonus).unwrap_or_default();
        self.guessed.extend(self.phrase.normalized().iter().copied());
        self.total_guessed = self.phrase.scoreable_len();
        info!(%player, bonus, "Phrase solved");

        events.push(Event::GuessResult {
            player,
            guess,
            outcome: GuessOutcome::Correct,
            amount_won: Some(bonus),
        });
        events.push(Event::ScoreUpdated { player, score });
        events.push(self.revealed());
        self.complete(&mut events);
        Ok(events)
    }

    /// Compares a normalized guess with the phrase, ignoring punctuation and spacing.
    fn matches_phrase(&self, guess: &str) -> bool {
        let ignored = &self.rules.ignored;
        let wanted = self.phrase.normalized().iter().filter(|c| !ignored.contains(**c));
        let given = guess.chars().filter(|c| !ignored.contains(*c));
        wanted.copied().eq(given)
    }

    /// Moves the turn to the next player and spins a new prize.
    fn pass_turn(
        &mut self,
        rng: &mut GameRng,
        events: &mut Vec<Event>,
    ) -> Result<(), RoundError> {
        if self.order.is_empty() {
            warn!(round = self.number, "Turn advance with no players");
            return Err(RoundError::EmptyRoster);
        }
        self.turn = (self.turn + 1) % self.order.len();
        self.prize = self.wheel.spin(rng);
        events.push(Event::TurnChanged {
            owner: self.order[self.turn],
        });
        events.push(Event::PrizeUpdated { amount: self.prize });
        Ok(())
    }

    fn complete(&mut self, events: &mut Vec<Event>) {
        self.phase = RoundPhase::Complete;
        info!(round = self.number, phrase = %self.phrase.text(), "Round complete");
        events.push(Event::RoundEnded {
            round: self.number,
            phrase: self.phrase.text().to_string(),
        });
    }

    fn revealed(&self) -> Event {
        Event::PhraseRevealed {
            masked_phrase: self.masked_phrase(),
        }
    }

    /// Drops a departed player from the turn order.
    ///
    /// If they held the turn it passes to their successor with a fresh
    /// prize, and the `TurnChanged`/`PrizeUpdated` pair is returned.
    /// Players not in this round are ignored.
    #[instrument(skip(self, rng), fields(round = self.number))]
    pub fn remove_player(
        &mut self,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Result<Vec<Event>, RoundError> {
        let Some(removed) = self.order.iter().position(|p| *p == player) else {
            return Ok(Vec::new());
        };
        self.order.remove(removed);

        let remap = remap_turn(self.turn, removed, self.order.len());
        debug!(?remap, "Turn remapped after departure");
        let events = match remap {
            TurnRemap::Vacant => {
                self.turn = 0;
                return Err(RoundError::EmptyRoster);
            }
            TurnRemap::Unchanged(turn) | TurnRemap::Shifted(turn) => {
                self.turn = turn;
                Vec::new()
            }
            TurnRemap::Passed(turn) => {
                self.turn = turn;
                if self.phase == RoundPhase::AwaitingGuess {
                    self.prize = self.wheel.spin(rng);
                    vec![
                        Event::TurnChanged {
                            owner: self.order[turn],
                        },
                        Event::PrizeUpdated { amount: self.prize },
                    ]
                } else {
                    Vec::new()
                }
            }
        };
        debug_assert!(RoundInvariants::check_all(self).is_ok());
        Ok(events)
    }

    /// The phrase with every unrevealed character replaced by the placeholder.
    pub fn masked_phrase(&self) -> String {
        self.phrase
            .text()
            .chars()
            .zip(self.phrase.normalized())
            .map(|(shown, folded)| {
                if self.guessed.contains(folded) {
                    shown
                } else {
                    self.rules.placeholder
                }
            })
            .collect()
    }

    /// 1-based round number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// The phrase being guessed.
    pub fn phrase(&self) -> &Phrase {
        &self.phrase
    }

    /// Turn order for this round.
    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    /// Index of the turn holder in [`RoundEngine::order`].
    pub fn turn_index(&self) -> usize {
        self.turn
    }

    /// Player holding the turn, if any.
    pub fn current_player(&self) -> Option<PlayerId> {
        self.order.get(self.turn).copied()
    }

    /// Current prize per revealed letter.
    pub fn prize(&self) -> u64 {
        self.prize
    }

    /// Characters revealed so far, ignored characters included.
    pub fn guessed(&self) -> &BTreeSet<char> {
        &self.guessed
    }

    /// Number of scoreable characters revealed.
    pub fn total_guessed(&self) -> usize {
        self.total_guessed
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Checks whether the round is over.
    pub fn is_complete(&self) -> bool {
        self.phase == RoundPhase::Complete
    }

    /// Rules this round is played under.
    pub fn rules(&self) -> &RoundRules {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::fortune::Player;

    fn setup(text: &str, players: u64) -> (RoundEngine, PlayerRoster, GameRng) {
        let rules = RoundRules::default();
        let mut roster = PlayerRoster::new();
        for id in 0..players {
            roster.add(Player::new(id, format!("p{id}")));
        }
        let mut rng = GameRng::new(17);
        let phrase = Phrase::new(text, Some("Test"), &rules.ignored);
        let (round, _) = RoundEngine::begin(
            1,
            roster.snapshot(),
            phrase,
            0,
            PrizeWheel::default(),
            rules,
            &mut rng,
        )
        .unwrap();
        (round, roster, rng)
    }

    #[test]
    fn opening_events_announce_round_turn_and_prize() {
        let rules = RoundRules::default();
        let mut rng = GameRng::new(2);
        let phrase = Phrase::new("Break a leg", Some("Phrase"), &rules.ignored);
        let (round, events) = RoundEngine::begin(
            2,
            vec![PlayerId(5), PlayerId(6)],
            phrase,
            1,
            PrizeWheel::default(),
            rules,
            &mut rng,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                Event::RoundStarted {
                    round: 2,
                    masked_phrase: "_____ _ ___".to_string(),
                    category: Some("Phrase".to_string()),
                },
                Event::TurnChanged { owner: PlayerId(6) },
                Event::PrizeUpdated {
                    amount: round.prize()
                },
            ]
        );
    }

    #[test]
    fn begin_with_no_players_fails() {
        let rules = RoundRules::default();
        let phrase = Phrase::new("cat", None, &rules.ignored);
        let mut rng = GameRng::new(1);
        let err =
            RoundEngine::begin(1, Vec::new(), phrase, 0, PrizeWheel::default(), rules, &mut rng)
                .unwrap_err();
        assert_eq!(err, RoundError::EmptyRoster);
    }

    #[test]
    fn rejected_round_error_reads_as_its_reason() {
        use std::error::Error as _;

        let err = RoundError::from(Rejection::DuplicateGuess);
        assert_eq!(err.to_string(), "That letter has already been guessed");
        assert!(err.source().is_none());

        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(Rejection::InvalidTurn);
        assert_eq!(boxed.to_string(), "It is not your turn");
    }

    #[test]
    fn masked_phrase_shows_punctuation_and_guessed_letters() {
        let (mut round, mut roster, mut rng) = setup("Rock 'n' Roll", 1);
        assert_eq!(round.masked_phrase(), "____ '_' ____");
        round.submit_guess(&mut roster, &mut rng, PlayerId(0), "R").unwrap();
        assert_eq!(round.masked_phrase(), "R___ '_' R___");
    }

    #[test]
    fn empty_and_whitespace_guesses_are_invalid() {
        let (mut round, mut roster, mut rng) = setup("cat", 2);
        for raw in ["", "   "] {
            assert_eq!(
                round.submit_guess(&mut roster, &mut rng, PlayerId(0), raw),
                Err(RoundError::Rejected(Rejection::InvalidGuessFormat))
            );
        }
        assert_eq!(round.current_player(), Some(PlayerId(0)));
    }

    #[test]
    fn non_letter_single_character_is_invalid() {
        let (mut round, mut roster, mut rng) = setup("cat", 2);
        for raw in ["7", "-", "?"] {
            assert_eq!(
                round.submit_guess(&mut roster, &mut rng, PlayerId(0), raw),
                Err(RoundError::Rejected(Rejection::InvalidGuessFormat))
            );
        }
    }

    #[test]
    fn duplicate_letter_keeps_turn() {
        let (mut round, mut roster, mut rng) = setup("cat", 2);
        round.submit_guess(&mut roster, &mut rng, PlayerId(0), "x").unwrap();
        assert_eq!(round.current_player(), Some(PlayerId(1)));
        assert_eq!(
            round.submit_guess(&mut roster, &mut rng, PlayerId(1), "X"),
            Err(RoundError::Rejected(Rejection::DuplicateGuess))
        );
        assert_eq!(round.current_player(), Some(PlayerId(1)));
    }

    #[test]
    fn phrase_guess_tolerates_case_spacing_and_punctuation() {
        let (mut round, mut roster, mut rng) = setup("Rock 'n' Roll", 1);
        let events = round
            .submit_guess(&mut roster, &mut rng, PlayerId(0), "  ROCK N ROLL ")
            .unwrap();
        assert!(round.is_complete());
        assert_eq!(round.masked_phrase(), "Rock 'n' Roll");
        assert_eq!(roster.get(PlayerId(0)).unwrap().score, DEFAULT_PHRASE_BONUS);
        assert!(matches!(events.last(), Some(Event::RoundEnded { round: 1, .. })));
    }

    #[test]
    fn wrong_phrase_guess_passes_turn() {
        let (mut round, mut roster, mut rng) = setup("cat", 2);
        let events = round.submit_guess(&mut roster, &mut rng, PlayerId(0), "dog").unwrap();
        assert_eq!(round.current_player(), Some(PlayerId(1)));
        assert!(events.contains(&Event::TurnChanged { owner: PlayerId(1) }));
        assert_eq!(roster.get(PlayerId(0)).unwrap().score, 0);
    }

    #[test]
    fn guesses_after_completion_are_refused() {
        let (mut round, mut roster, mut rng) = setup("cat", 1);
        round.submit_guess(&mut roster, &mut rng, PlayerId(0), "cat").unwrap();
        assert_eq!(
            round.submit_guess(&mut roster, &mut rng, PlayerId(0), "a"),
            Err(RoundError::Rejected(Rejection::InvalidTurn))
        );
    }

    #[test]
    fn removing_last_player_is_fatal() {
        let (mut round, _, mut rng) = setup("cat", 1);
        assert_eq!(round.remove_player(PlayerId(0), &mut rng), Err(RoundError::EmptyRoster));
    }

    #[test]
    fn removing_unknown_player_changes_nothing() {
        let (mut round, _, mut rng) = setup("cat", 2);
        assert_eq!(round.remove_player(PlayerId(42), &mut rng), Ok(Vec::new()));
        assert_eq!(round.order().len(), 2);
    }
}
